use serde_json::{Value, json};

use crate::engine::types::{AgentId, AgentResult, QueryId};

pub struct AgentResultFactory {
    query_id: QueryId,
    agent_id: AgentId,
    payload: Value,
}

impl AgentResultFactory {
    pub fn new() -> Self {
        Self {
            query_id: QueryId::new(),
            agent_id: AgentId::from_u128(1),
            payload: json!({"rows": []}),
        }
    }

    pub fn with_query_id(mut self, query_id: QueryId) -> Self {
        self.query_id = query_id;
        self
    }

    pub fn with_agent(mut self, n: u128) -> Self {
        self.agent_id = AgentId::from_u128(n);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn create(self) -> AgentResult {
        AgentResult::new(self.query_id, self.agent_id, self.payload)
    }
}
