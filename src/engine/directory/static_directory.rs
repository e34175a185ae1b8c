use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::traits::{AgentDirectory, DirectorySnapshot};
use crate::engine::errors::DirectoryError;
use crate::engine::types::{AgentId, AgentRecord, AgentStatus};
use crate::shared::config::DirectoryConfig;

const LOG_TARGET: &str = "query_broker::directory";

/// Directory backed by an in-memory snapshot, seeded from configuration.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    snapshot: RwLock<DirectorySnapshot>,
}

impl StaticDirectory {
    pub fn new(snapshot: DirectorySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn from_config(cfg: &DirectoryConfig) -> Self {
        info!(
            target: LOG_TARGET,
            agents = cfg.agents.len(),
            tables = cfg.schema.tables.len(),
            "Loaded static agent directory"
        );
        Self::new(DirectorySnapshot {
            schema: cfg.schema.clone(),
            agents: cfg.agents.clone(),
        })
    }

    /// Adds the agent, or replaces the entry with the same id.
    pub fn upsert(&self, record: AgentRecord) {
        let mut snapshot = self.snapshot.write();
        match snapshot
            .agents
            .iter_mut()
            .find(|a| a.agent_id == record.agent_id)
        {
            Some(existing) => *existing = record,
            None => snapshot.agents.push(record),
        }
    }

    pub fn remove(&self, agent_id: &AgentId) -> Option<AgentRecord> {
        let mut snapshot = self.snapshot.write();
        let pos = snapshot.agents.iter().position(|a| &a.agent_id == agent_id)?;
        Some(snapshot.agents.remove(pos))
    }

    /// Returns false if the agent is unknown.
    pub fn set_status(&self, agent_id: &AgentId, status: AgentStatus) -> bool {
        let mut snapshot = self.snapshot.write();
        match snapshot.agents.iter_mut().find(|a| &a.agent_id == agent_id) {
            Some(record) => {
                debug!(target: LOG_TARGET, %agent_id, ?status, "Agent status changed");
                record.status = status;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AgentDirectory for StaticDirectory {
    async fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError> {
        Ok(self.snapshot.read().clone())
    }
}
