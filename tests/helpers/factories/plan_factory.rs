use std::collections::BTreeMap;

use serde_json::json;

use crate::engine::types::{AgentId, SubPlan};

pub struct PlanFactory;

impl PlanFactory {
    /// One trivial sub-plan per agent number.
    pub fn compiled(agents: &[u128]) -> BTreeMap<AgentId, SubPlan> {
        agents
            .iter()
            .map(|n| (AgentId::from_u128(*n), SubPlan::new(json!({ "agent": *n as u64 }))))
            .collect()
    }
}
