use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{AgentId, QueryId};
use super::plan::CompilerErrorGroup;

/// A partial result pushed by one agent for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub query_id: QueryId,
    pub agent_id: AgentId,
    #[serde(default)]
    pub payload: Value,
}

impl AgentResult {
    pub fn new(query_id: QueryId, agent_id: AgentId, payload: Value) -> Self {
        Self {
            query_id,
            agent_id,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentOutcome {
    Responded { payload: Value },
    NoResponse,
}

/// One entry of an assembled response. Every target agent gets one,
/// whether or not it answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_id: AgentId,
    pub outcome: AgentOutcome,
}

impl AgentResponse {
    pub fn responded(agent_id: AgentId, payload: Value) -> Self {
        Self {
            agent_id,
            outcome: AgentOutcome::Responded { payload },
        }
    }

    pub fn no_response(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            outcome: AgentOutcome::NoResponse,
        }
    }

    pub fn has_responded(&self) -> bool {
        matches!(self.outcome, AgentOutcome::Responded { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            AgentOutcome::Responded { payload } => Some(payload),
            AgentOutcome::NoResponse => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum QueryStatus {
    Ok,
    CompileError {
        diagnostics: CompilerErrorGroup,
        rendered: String,
    },
    DispatchError {
        agent_id: AgentId,
        reason: String,
    },
    Timeout {
        missing: Vec<AgentId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query_id: QueryId,
    pub status: QueryStatus,
    pub responses: Vec<AgentResponse>,
}

impl QueryResponse {
    pub fn completed(query_id: QueryId, responses: Vec<AgentResponse>) -> Self {
        Self {
            query_id,
            status: QueryStatus::Ok,
            responses,
        }
    }

    pub fn compile_failed(query_id: QueryId, diagnostics: CompilerErrorGroup) -> Self {
        let rendered = diagnostics.to_string();
        Self {
            query_id,
            status: QueryStatus::CompileError {
                diagnostics,
                rendered,
            },
            responses: Vec::new(),
        }
    }

    pub fn dispatch_failed(query_id: QueryId, agent_id: AgentId, reason: impl ToString) -> Self {
        Self {
            query_id,
            status: QueryStatus::DispatchError {
                agent_id,
                reason: reason.to_string(),
            },
            responses: Vec::new(),
        }
    }

    pub fn timed_out(
        query_id: QueryId,
        missing: Vec<AgentId>,
        responses: Vec<AgentResponse>,
    ) -> Self {
        Self {
            query_id,
            status: QueryStatus::Timeout { missing },
            responses,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, QueryStatus::Ok)
    }
}
