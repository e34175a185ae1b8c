use serde_json::{Value, json};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::bus::{AgentRequest, ChannelBus};
use crate::engine::topology::describe_agent;
use crate::engine::types::{AgentDescriptor, AgentRecord, AgentResult};

const LOG_TARGET: &str = "query_broker::agent";

/// An in-process stand-in for a remote agent.
#[derive(Debug, Clone)]
pub struct LocalAgent {
    pub descriptor: AgentDescriptor,
    pub hostname: String,
}

impl LocalAgent {
    pub fn from_record(record: &AgentRecord) -> Self {
        Self {
            descriptor: describe_agent(record),
            hostname: record.hostname.clone(),
        }
    }

    /// What this agent reports back for one sub-plan.
    pub fn answer(&self, request: &AgentRequest) -> Value {
        json!({
            "agent_id": self.descriptor.agent_id,
            "hostname": self.hostname,
            "role": self.descriptor.role,
            "plan": request.plan,
        })
    }
}

/// Attaches one inbox per record and starts a worker for each.
pub fn spawn_local_agents(
    bus: &ChannelBus,
    records: &[AgentRecord],
    results_tx: Sender<AgentResult>,
) -> Vec<JoinHandle<()>> {
    let handles: Vec<JoinHandle<()>> = records
        .iter()
        .map(|record| {
            let agent = LocalAgent::from_record(record);
            let rx = bus.attach(record.agent_id);
            tokio::spawn(run_agent_loop(agent, rx, results_tx.clone()))
        })
        .collect();

    info!(target: LOG_TARGET, agents = handles.len(), "Local agents started");
    handles
}

/// Answers requests until the inbox or the results channel closes.
pub async fn run_agent_loop(
    agent: LocalAgent,
    mut rx: Receiver<AgentRequest>,
    results_tx: Sender<AgentResult>,
) {
    let agent_id = agent.descriptor.agent_id;
    info!(target: LOG_TARGET, %agent_id, role = ?agent.descriptor.role, "Agent worker started");

    while let Some(request) = rx.recv().await {
        let query_id = request.query_id;
        debug!(target: LOG_TARGET, %agent_id, %query_id, "Received sub-plan");

        let result = AgentResult::new(query_id, agent_id, agent.answer(&request));
        if results_tx.send(result).await.is_err() {
            warn!(target: LOG_TARGET, %agent_id, %query_id, "Result channel closed");
            break;
        }
    }

    info!(target: LOG_TARGET, %agent_id, "Agent worker shutting down");
}
