use serde::{Deserialize, Serialize};

use crate::engine::types::{QueryId, SubPlan};

/// Work order delivered to one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub query_id: QueryId,
    pub plan: SubPlan,
}
