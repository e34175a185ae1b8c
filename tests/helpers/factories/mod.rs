pub mod agent_record_factory;
pub mod agent_result_factory;
pub mod plan_factory;
pub mod schema_factory;
pub mod topology_factory;

pub use agent_record_factory::AgentRecordFactory;
pub use agent_result_factory::AgentResultFactory;
pub use plan_factory::PlanFactory;
pub use schema_factory::SchemaFactory;
pub use topology_factory::TopologyFactory;

#[cfg(test)]
mod agent_record_factory_test;
#[cfg(test)]
mod topology_factory_test;
