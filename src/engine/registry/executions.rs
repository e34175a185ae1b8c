use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::engine::errors::RegistryError;
use crate::engine::execution::Execution;
use crate::engine::types::QueryId;

const LOG_TARGET: &str = "query_broker::registry";

/// Concurrent map from query id to the execution handling it.
///
/// Lookups hand back a cloned `Arc`, so no caller holds the map lock
/// while it works with the execution.
#[derive(Default)]
pub struct ExecutionRegistry {
    executions: Mutex<HashMap<QueryId, Arc<dyn Execution>>>,
}

impl ExecutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, execution: Arc<dyn Execution>) -> Result<(), RegistryError> {
        let query_id = execution.query_id();
        let mut executions = self.executions.lock();
        if executions.contains_key(&query_id) {
            warn!(target: LOG_TARGET, %query_id, "Query id already registered");
            return Err(RegistryError::AlreadyRegistered(query_id));
        }
        executions.insert(query_id, execution);
        debug!(target: LOG_TARGET, %query_id, in_flight = executions.len(), "Registered");
        Ok(())
    }

    /// Registers `execution` and returns a guard that removes it again
    /// when dropped.
    pub fn register_scoped(
        self: &Arc<Self>,
        execution: Arc<dyn Execution>,
    ) -> Result<Registration, RegistryError> {
        let query_id = execution.query_id();
        self.register(execution)?;
        Ok(Registration {
            registry: Arc::clone(self),
            query_id,
        })
    }

    pub fn lookup(&self, query_id: &QueryId) -> Option<Arc<dyn Execution>> {
        self.executions.lock().get(query_id).cloned()
    }

    /// Removing an id that is not present is a no-op.
    pub fn unregister(&self, query_id: &QueryId) -> Option<Arc<dyn Execution>> {
        let mut executions = self.executions.lock();
        let removed = executions.remove(query_id);
        if removed.is_some() {
            debug!(target: LOG_TARGET, %query_id, in_flight = executions.len(), "Unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.executions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.executions.lock().is_empty()
    }

    /// Ids currently in flight, in no particular order.
    pub fn in_flight(&self) -> Vec<QueryId> {
        self.executions.lock().keys().copied().collect()
    }
}

/// Keeps a query registered for as long as it is alive.
pub struct Registration {
    registry: Arc<ExecutionRegistry>,
    query_id: QueryId,
}

impl Registration {
    pub fn query_id(&self) -> QueryId {
        self.query_id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(&self.query_id);
    }
}
