use async_trait::async_trait;

use super::message::AgentRequest;
use crate::engine::errors::BusError;
use crate::engine::types::AgentId;

/// Outbound half of the transport between the broker and its agents.
///
/// `send` only hands the request to the transport; it must not wait for
/// the agent to act on it. Results come back separately through ingress,
/// possibly before `send` returns, possibly duplicated.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn send(&self, destination: &AgentId, request: AgentRequest) -> Result<(), BusError>;
}
