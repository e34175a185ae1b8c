use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::execution::ExecutionState;
use crate::engine::types::{AgentId, AgentResponse, QueryId};

const INGRESS_TARGET: &str = "query_broker::ingress";

/// Failures reported by a message bus when handing a sub-plan to an agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("no route to agent {0}")]
    UnknownDestination(AgentId),

    #[error("agent {0} is no longer receiving")]
    Closed(AgentId),

    #[error("agent {0} inbox is full")]
    Backpressure(AgentId),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("agent directory unavailable: {0}")]
    Unavailable(String),
}

/// Planner infrastructure failures. A query the planner refuses to
/// compile is not one of these; it comes back as a rejected plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    #[error("planner already released")]
    Released,

    #[error("planner failed: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("agent {agent_id} is not a target of query {query_id}")]
    UnknownAgent { query_id: QueryId, agent_id: AgentId },

    #[error("dispatch to agent {agent_id} failed: {source}")]
    Dispatch {
        agent_id: AgentId,
        #[source]
        source: BusError,
    },

    #[error("plan for query {query_id} does not cover its target set")]
    PlanMismatch { query_id: QueryId },

    #[error("query {query_id} timed out waiting on {} agent(s)", missing.len())]
    Timeout {
        query_id: QueryId,
        missing: Vec<AgentId>,
        partial: Vec<AgentResponse>,
    },

    #[error("query {query_id} is {found:?}, expected {expected:?}")]
    InvalidState {
        query_id: QueryId,
        expected: ExecutionState,
        found: ExecutionState,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("query {0} is already registered")]
    AlreadyRegistered(QueryId),
}

/// Outcomes of routing an inbound agent result that did not land.
/// Both are expected under normal operation (late, duplicate or misrouted
/// deliveries) and are never treated as server faults.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngressError {
    #[error("query {0} is not in flight")]
    UnknownQuery(QueryId),

    #[error("agent {agent_id} is not a target of query {query_id}")]
    UnknownAgent { query_id: QueryId, agent_id: AgentId },

    #[error("query {query_id} refused the result: {reason}")]
    Rejected { query_id: QueryId, reason: String },
}

impl IngressError {
    pub fn log(&self) {
        match self {
            IngressError::UnknownQuery(query_id) => {
                debug!(
                    target: INGRESS_TARGET,
                    %query_id,
                    "Dropping result for query that is not in flight"
                );
            }
            IngressError::UnknownAgent { query_id, agent_id } => {
                warn!(
                    target: INGRESS_TARGET,
                    %query_id,
                    %agent_id,
                    "Dropping result from agent outside the target set"
                );
            }
            IngressError::Rejected { query_id, reason } => {
                warn!(target: INGRESS_TARGET, %query_id, %reason, "Result refused");
            }
        }
    }
}

/// Failures that abort `execute_query` itself, as opposed to a query
/// that ran and failed (those are reported in the response status).
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
