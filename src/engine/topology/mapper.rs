use serde::{Deserialize, Serialize};

use crate::engine::directory::DirectorySnapshot;
use crate::engine::types::{
    AgentDescriptor, AgentRecord, AgentRole, Capabilities, Schema,
};

/// Planner input: the schema plus every agent tagged with its role.
/// Collectors come first, then aggregators, each in directory order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub schema: Schema,
    pub agents: Vec<AgentDescriptor>,
}

impl Topology {
    pub fn collectors(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter().filter(|a| a.is_collector())
    }

    pub fn aggregators(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter().filter(|a| a.is_aggregator())
    }
}

/// Classifies a single directory entry.
pub fn describe_agent(record: &AgentRecord) -> AgentDescriptor {
    let role = if record.collects_data {
        AgentRole::Collector
    } else {
        AgentRole::Aggregator
    };

    let network_address = match role {
        AgentRole::Collector => None,
        AgentRole::Aggregator => Some(record.ip_address.clone()),
    };

    AgentDescriptor {
        agent_id: record.agent_id,
        role,
        network_address,
        capabilities: Capabilities::for_role(role),
    }
}

pub fn build_topology(snapshot: &DirectorySnapshot) -> Topology {
    let (collectors, aggregators): (Vec<_>, Vec<_>) = snapshot
        .agents
        .iter()
        .map(describe_agent)
        .partition(AgentDescriptor::is_collector);

    Topology {
        schema: snapshot.schema.clone(),
        agents: collectors.into_iter().chain(aggregators).collect(),
    }
}
