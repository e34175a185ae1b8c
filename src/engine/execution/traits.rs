use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;

use super::state::ExecutionState;
use crate::engine::bus::MessageBus;
use crate::engine::errors::ExecutionError;
use crate::engine::types::{AgentId, AgentResponse, AgentResult, QueryId, SubPlan};

/// What a single accepted delivery did to its execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// First result from this agent; others are still outstanding.
    Accepted,
    /// First result from this agent, and the last one missing. The caller
    /// that receives this is the one that signalled completion.
    Completed,
    /// The agent had already reported. Payload replaced, nothing counted.
    Duplicate,
}

/// One in-flight query: dispatch, accumulate, wait.
#[async_trait]
pub trait Execution: Send + Sync {
    fn query_id(&self) -> QueryId;

    /// Target set, ascending. Fixed at construction.
    fn targets(&self) -> Vec<AgentId>;

    fn state(&self) -> ExecutionState;

    async fn dispatch(&self, plans: BTreeMap<AgentId, SubPlan>) -> Result<(), ExecutionError>;

    fn add_result(&self, result: AgentResult) -> Result<Delivery, ExecutionError>;

    /// Suspends until every target has reported or `deadline` passes.
    /// Responses are ordered by agent id.
    async fn await_completion(&self, deadline: Instant)
    -> Result<Vec<AgentResponse>, ExecutionError>;
}

/// Builds executions for the broker; swapped out in tests.
pub trait ExecutionFactory: Send + Sync {
    fn create(
        &self,
        bus: Arc<dyn MessageBus>,
        query_id: QueryId,
        targets: Vec<AgentId>,
    ) -> Arc<dyn Execution>;
}
