use crate::engine::registry::ExecutionRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Server-wide state: shutdown flag and query admission.
#[derive(Clone)]
pub struct ServerState {
    shutdown: Arc<AtomicBool>,
    admitted: Arc<AtomicUsize>,
    registry: Arc<ExecutionRegistry>,
    max_in_flight_queries: usize,
}

/// One reserved query slot, returned to the pool on drop.
pub struct Admission {
    admitted: Arc<AtomicUsize>,
}

impl Drop for Admission {
    fn drop(&mut self) {
        self.admitted.fetch_sub(1, Ordering::AcqRel);
    }
}

impl ServerState {
    pub fn new(registry: Arc<ExecutionRegistry>, max_in_flight_queries: usize) -> Self {
        Self {
            shutdown: Arc::new(AtomicBool::new(false)),
            admitted: Arc::new(AtomicUsize::new(0)),
            registry,
            max_in_flight_queries,
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }

    /// True once the number of registered queries reaches the configured
    /// ceiling. New queries are refused until some finish.
    pub fn is_under_pressure(&self) -> bool {
        let in_flight = self.in_flight();
        if in_flight > 0 {
            tracing::debug!(
                target: "query_broker::backpressure",
                in_flight,
                max = self.max_in_flight_queries,
                "Backpressure check"
            );
        }
        in_flight >= self.max_in_flight_queries
    }

    /// Reserves a query slot, or `None` when the ceiling is reached.
    ///
    /// The slot count is bumped with a compare-and-swap so concurrent
    /// callers can never overshoot `max_in_flight_queries`. Queries
    /// registered without going through admission still count against
    /// the ceiling via the registry.
    pub fn try_admit(&self) -> Option<Admission> {
        if self.is_under_pressure() {
            return None;
        }
        let max = self.max_in_flight_queries;
        self.admitted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < max).then_some(n + 1)
            })
            .ok()?;
        Some(Admission {
            admitted: Arc::clone(&self.admitted),
        })
    }

    pub fn admitted(&self) -> usize {
        self.admitted.load(Ordering::Acquire)
    }
}
