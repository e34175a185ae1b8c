pub mod agent;
pub mod ids;
pub mod plan;
pub mod result;
pub mod schema;

pub use agent::{AgentDescriptor, AgentRecord, AgentRole, AgentStatus, Capabilities};
pub use ids::{AgentId, QueryId};
pub use plan::{CompilerError, CompilerErrorGroup, DistributedPlan, SubPlan};
pub use result::{AgentOutcome, AgentResponse, AgentResult, QueryResponse, QueryStatus};
pub use schema::{ColumnSpec, Schema, TableSchema};

#[cfg(test)]
mod plan_test;
