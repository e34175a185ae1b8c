use tracing::debug;

use super::traits::Planner;
use crate::engine::errors::PlannerError;
use crate::engine::topology::Topology;
use crate::engine::types::DistributedPlan;

const LOG_TARGET: &str = "query_broker::planner";

/// Scoped ownership of a planner. The planner is released exactly once,
/// either explicitly via [`PlannerSession::release`] or when the session
/// is dropped on any other exit path.
pub struct PlannerSession<'a> {
    planner: Option<PlannerHandle<'a>>,
}

enum PlannerHandle<'a> {
    Owned(Box<dyn Planner>),
    Borrowed(&'a mut dyn Planner),
}

impl PlannerHandle<'_> {
    fn get(&mut self) -> &mut dyn Planner {
        match self {
            PlannerHandle::Owned(planner) => planner.as_mut(),
            PlannerHandle::Borrowed(planner) => &mut **planner,
        }
    }
}

impl PlannerSession<'static> {
    pub fn new(planner: Box<dyn Planner>) -> Self {
        Self {
            planner: Some(PlannerHandle::Owned(planner)),
        }
    }
}

impl<'a> PlannerSession<'a> {
    /// Wraps a planner owned by the caller. The session still releases it.
    pub fn borrowed(planner: &'a mut dyn Planner) -> Self {
        Self {
            planner: Some(PlannerHandle::Borrowed(planner)),
        }
    }

    pub fn plan(&mut self, topology: &Topology, query: &str) -> Result<DistributedPlan, PlannerError> {
        match self.planner.as_mut() {
            Some(handle) => handle.get().plan(topology, query),
            None => Err(PlannerError::Released),
        }
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(mut handle) = self.planner.take() {
            handle.get().release();
            debug!(target: LOG_TARGET, "Planner released");
        }
    }
}

impl Drop for PlannerSession<'_> {
    fn drop(&mut self) {
        self.release_inner();
    }
}
