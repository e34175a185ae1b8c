use serde::{Deserialize, Serialize};

use super::ids::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Healthy,
    Unresponsive,
}

impl Default for AgentStatus {
    fn default() -> Self {
        AgentStatus::Healthy
    }
}

/// A raw entry from the agent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: AgentId,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ip_address: String,
    /// Agents that gather data on their own host.
    pub collects_data: bool,
    #[serde(default)]
    pub status: AgentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Collector,
    Aggregator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub has_local_store: bool,
    pub accepts_remote_sources: bool,
    pub has_network_endpoint: bool,
    pub processes_data: bool,
}

impl Capabilities {
    pub fn for_role(role: AgentRole) -> Self {
        match role {
            AgentRole::Collector => Self {
                has_local_store: true,
                accepts_remote_sources: false,
                has_network_endpoint: false,
                processes_data: true,
            },
            AgentRole::Aggregator => Self {
                has_local_store: false,
                accepts_remote_sources: true,
                has_network_endpoint: true,
                processes_data: true,
            },
        }
    }
}

/// An agent as the planner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub agent_id: AgentId,
    pub role: AgentRole,
    pub network_address: Option<String>,
    pub capabilities: Capabilities,
}

impl AgentDescriptor {
    pub fn is_collector(&self) -> bool {
        self.role == AgentRole::Collector
    }

    pub fn is_aggregator(&self) -> bool {
        self.role == AgentRole::Aggregator
    }
}
