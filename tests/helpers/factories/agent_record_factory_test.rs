use crate::engine::types::{AgentId, AgentStatus};
use crate::test_helpers::factories::AgentRecordFactory;

#[test]
fn builds_records_with_defaults_and_overrides() {
    let c = AgentRecordFactory::collector(1).create();
    assert_eq!(c.agent_id, AgentId::from_u128(1));
    assert_eq!(c.hostname, "agent-1");
    assert!(c.collects_data);
    assert_eq!(c.status, AgentStatus::Healthy);

    let k = AgentRecordFactory::aggregator(2)
        .with_hostname("kelvin")
        .with_ip_address("10.1.1.1")
        .with_status(AgentStatus::Unresponsive)
        .create();
    assert!(!k.collects_data);
    assert_eq!(k.hostname, "kelvin");
    assert_eq!(k.ip_address, "10.1.1.1");
    assert_eq!(k.status, AgentStatus::Unresponsive);
}
