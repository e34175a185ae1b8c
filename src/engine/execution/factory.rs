use std::sync::Arc;

use super::coordinator::ExecutionCoordinator;
use super::traits::{Execution, ExecutionFactory};
use crate::engine::bus::MessageBus;
use crate::engine::types::{AgentId, QueryId};

#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinatorFactory;

impl ExecutionFactory for CoordinatorFactory {
    fn create(
        &self,
        bus: Arc<dyn MessageBus>,
        query_id: QueryId,
        targets: Vec<AgentId>,
    ) -> Arc<dyn Execution> {
        Arc::new(ExecutionCoordinator::new(bus, query_id, targets))
    }
}
