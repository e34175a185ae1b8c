use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::errors::DirectoryError;
use crate::engine::types::{AgentRecord, Schema};

/// Point-in-time view of the cluster: shared schema plus every known agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub schema: Schema,
    pub agents: Vec<AgentRecord>,
}

/// Source of agent and schema metadata. Queried once per request; callers
/// must not cache a snapshot across queries.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    async fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError>;
}
