use crate::engine::types::{AgentId, CompilerErrorGroup, DistributedPlan, SubPlan};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn error_group_renders_one_diagnostic_per_line() {
    let mut group = CompilerErrorGroup::single(1, 6, "table 'foo' not found");
    group.push(3, 1, "unexpected token");

    assert_eq!(
        group.to_string(),
        "1:6: table 'foo' not found\n3:1: unexpected token"
    );
    assert_eq!(group.len(), 2);
}

#[test]
fn empty_error_group_renders_nothing() {
    let group = CompilerErrorGroup::default();
    assert!(group.is_empty());
    assert_eq!(group.to_string(), "");
}

#[test]
fn compiled_plan_targets_are_ascending() {
    let mut plans = BTreeMap::new();
    plans.insert(AgentId::from_u128(9), SubPlan::new(json!({"op": "merge"})));
    plans.insert(AgentId::from_u128(2), SubPlan::new(json!({"op": "collect"})));

    let plan = DistributedPlan::Compiled(plans);
    assert!(plan.is_compiled());
    assert_eq!(
        plan.targets(),
        vec![AgentId::from_u128(2), AgentId::from_u128(9)]
    );
}

#[test]
fn rejected_plan_has_no_targets() {
    let plan = DistributedPlan::Rejected(CompilerErrorGroup::single(1, 1, "empty query"));
    assert!(!plan.is_compiled());
    assert!(plan.targets().is_empty());
}
