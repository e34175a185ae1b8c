use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Receiver, Sender, channel};
use tracing::{debug, info};

use super::message::AgentRequest;
use super::traits::MessageBus;
use crate::engine::errors::BusError;
use crate::engine::types::AgentId;

const LOG_TARGET: &str = "query_broker::bus";

/// In-process bus: one bounded tokio channel per attached agent.
#[derive(Debug)]
pub struct ChannelBus {
    routes: RwLock<HashMap<AgentId, Sender<AgentRequest>>>,
    capacity: usize,
}

impl ChannelBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Opens an inbox for `agent_id`. Re-attaching replaces the old inbox,
    /// whose receiver then sees the channel close.
    pub fn attach(&self, agent_id: AgentId) -> Receiver<AgentRequest> {
        let (tx, rx) = channel(self.capacity);
        self.routes.write().insert(agent_id, tx);
        info!(target: LOG_TARGET, %agent_id, capacity = self.capacity, "Agent attached");
        rx
    }

    pub fn detach(&self, agent_id: &AgentId) -> bool {
        let removed = self.routes.write().remove(agent_id).is_some();
        if removed {
            info!(target: LOG_TARGET, %agent_id, "Agent detached");
        }
        removed
    }

    pub fn is_attached(&self, agent_id: &AgentId) -> bool {
        self.routes.read().contains_key(agent_id)
    }

    pub fn attached_count(&self) -> usize {
        self.routes.read().len()
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    async fn send(&self, destination: &AgentId, request: AgentRequest) -> Result<(), BusError> {
        let tx = self
            .routes
            .read()
            .get(destination)
            .cloned()
            .ok_or(BusError::UnknownDestination(*destination))?;

        let query_id = request.query_id;
        tx.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => BusError::Backpressure(*destination),
            TrySendError::Closed(_) => BusError::Closed(*destination),
        })?;

        debug!(target: LOG_TARGET, %query_id, agent_id = %destination, "Sub-plan sent");
        Ok(())
    }
}
