use crate::engine::agent::{LocalAgent, spawn_local_agents};
use crate::engine::bus::{AgentRequest, ChannelBus, MessageBus};
use crate::engine::types::{AgentId, QueryId, SubPlan};
use crate::logging::init_for_tests;
use crate::test_helpers::factories::AgentRecordFactory;
use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

#[tokio::test]
async fn each_agent_answers_its_own_sub_plan() {
    init_for_tests();
    let bus = ChannelBus::new(8);
    let records = vec![
        AgentRecordFactory::collector(1).with_hostname("c1").create(),
        AgentRecordFactory::aggregator(2).with_hostname("k1").create(),
    ];
    let (tx, mut rx) = mpsc::channel(8);
    let handles = spawn_local_agents(&bus, &records, tx);

    assert_eq!(handles.len(), 2);
    assert_eq!(bus.attached_count(), 2);

    let query_id = QueryId::new();
    bus.send(
        &AgentId::from_u128(2),
        AgentRequest {
            query_id,
            plan: SubPlan::new(json!({"op": "merge"})),
        },
    )
    .await
    .expect("send");

    let result = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("answered in time")
        .expect("channel open");

    assert_eq!(result.query_id, query_id);
    assert_eq!(result.agent_id, AgentId::from_u128(2));
    assert_eq!(result.payload["role"], json!("aggregator"));
    assert_eq!(result.payload["hostname"], json!("k1"));
    assert_eq!(result.payload["plan"], json!({"op": "merge"}));
}

#[tokio::test]
async fn worker_stops_when_detached() {
    init_for_tests();
    let bus = ChannelBus::new(1);
    let records = vec![AgentRecordFactory::collector(7).create()];
    let (tx, _rx) = mpsc::channel(1);
    let mut handles = spawn_local_agents(&bus, &records, tx);

    assert!(bus.detach(&AgentId::from_u128(7)));

    let handle = handles.pop().expect("one worker");
    timeout(Duration::from_secs(1), handle)
        .await
        .expect("worker exits")
        .expect("no panic");
}

#[test]
fn answer_echoes_plan_and_role() {
    let agent = LocalAgent::from_record(&AgentRecordFactory::collector(3).create());
    let request = AgentRequest {
        query_id: QueryId::new(),
        plan: SubPlan::new(json!({"op": "collect", "query": "q"})),
    };

    let payload = agent.answer(&request);

    assert_eq!(payload["role"], json!("collector"));
    assert_eq!(payload["plan"]["op"], json!("collect"));
    assert_eq!(payload["agent_id"], json!(AgentId::from_u128(3).to_string()));
}
