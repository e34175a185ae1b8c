use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use super::traits::{Planner, PlannerFactory};
use crate::engine::errors::PlannerError;
use crate::engine::topology::Topology;
use crate::engine::types::{AgentId, CompilerErrorGroup, DistributedPlan, SubPlan};

const LOG_TARGET: &str = "query_broker::planner::fanout";

/// Reference planner: every collector scans locally and the lowest-id
/// aggregator, if there is one, merges what the collectors produce.
///
/// It only understands enough of the query text to reject blank queries
/// and `from <table>` references to tables missing from the schema.
#[derive(Debug, Default)]
pub struct FanoutPlanner {
    released: bool,
}

impl FanoutPlanner {
    pub fn new() -> Self {
        Self { released: false }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn check(topology: &Topology, query: &str) -> CompilerErrorGroup {
        let mut errors = CompilerErrorGroup::default();

        if query.trim().is_empty() {
            errors.push(1, 1, "query is empty");
            return errors;
        }

        if !topology.schema.is_empty() {
            for (line, column, table) in table_references(query) {
                if !topology.schema.has_table(table) {
                    errors.push(line, column, format!("table '{table}' not found"));
                }
            }
        }

        if errors.is_empty() && topology.collectors().next().is_none() {
            errors.push(1, 1, "no data-collecting agents available");
        }

        errors
    }
}

impl Planner for FanoutPlanner {
    fn plan(&mut self, topology: &Topology, query: &str) -> Result<DistributedPlan, PlannerError> {
        if self.released {
            return Err(PlannerError::Released);
        }

        let errors = Self::check(topology, query);
        if !errors.is_empty() {
            debug!(target: LOG_TARGET, errors = errors.len(), "Query rejected");
            return Ok(DistributedPlan::Rejected(errors));
        }

        let sources: Vec<AgentId> = topology.collectors().map(|a| a.agent_id).collect();
        let mut plans = BTreeMap::new();

        for agent_id in &sources {
            plans.insert(
                *agent_id,
                SubPlan::new(json!({ "op": "collect", "query": query })),
            );
        }

        if let Some(merger) = topology.aggregators().map(|a| a.agent_id).min() {
            let source_ids: Vec<String> = sources.iter().map(ToString::to_string).collect();
            plans.insert(
                merger,
                SubPlan::new(json!({ "op": "merge", "query": query, "sources": source_ids })),
            );
        }

        debug!(target: LOG_TARGET, targets = plans.len(), "Query compiled");
        Ok(DistributedPlan::Compiled(plans))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FanoutPlannerFactory;

impl PlannerFactory for FanoutPlannerFactory {
    fn create(&self) -> Box<dyn Planner> {
        Box::new(FanoutPlanner::new())
    }
}

/// Yields `(line, column, table)` for each `from <table>` in the query.
/// Lines and columns are 1-based; the keyword match is case-insensitive.
fn table_references(query: &str) -> Vec<(u32, u32, &str)> {
    let mut refs = Vec::new();

    for (line_idx, line) in query.lines().enumerate() {
        let words = words_with_columns(line);
        for pair in words.windows(2) {
            let (_, keyword) = pair[0];
            let (column, table) = pair[1];
            if keyword.eq_ignore_ascii_case("from") {
                let table = table.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_');
                if !table.is_empty() {
                    refs.push((line_idx as u32 + 1, column, table));
                }
            }
        }
    }

    refs
}

fn words_with_columns(line: &str) -> Vec<(u32, &str)> {
    let mut words = Vec::new();
    let mut start: Option<(usize, u32)> = None;
    let mut column = 0u32;

    for (idx, ch) in line.char_indices() {
        column += 1;
        match (ch.is_whitespace(), start) {
            (false, None) => start = Some((idx, column)),
            (true, Some((begin, col))) => {
                words.push((col, &line[begin..idx]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some((begin, col)) = start {
        words.push((col, &line[begin..]));
    }

    words
}
