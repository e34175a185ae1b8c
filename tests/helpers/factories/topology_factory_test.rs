use crate::engine::types::AgentId;
use crate::test_helpers::factories::TopologyFactory;

#[test]
fn builds_topology_with_roles_and_schema() {
    let topology = TopologyFactory::new()
        .with_table("http_events")
        .with_aggregators(&[9])
        .with_collectors(&[1, 2])
        .create();

    assert!(topology.schema.has_table("http_events"));
    let collectors: Vec<AgentId> = topology.collectors().map(|a| a.agent_id).collect();
    assert_eq!(collectors, vec![AgentId::from_u128(1), AgentId::from_u128(2)]);
    assert_eq!(topology.agents.last().map(|a| a.agent_id), Some(AgentId::from_u128(9)));
}
