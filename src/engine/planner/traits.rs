use crate::engine::errors::PlannerError;
use crate::engine::topology::Topology;
use crate::engine::types::DistributedPlan;

/// Compiles a query against a topology into per-agent sub-plans.
///
/// Planners may hold native resources; `release` frees them and is called
/// exactly once per planner, see [`super::PlannerSession`].
pub trait Planner: Send {
    fn plan(&mut self, topology: &Topology, query: &str) -> Result<DistributedPlan, PlannerError>;

    fn release(&mut self);
}

/// Hands out one fresh planner per query.
pub trait PlannerFactory: Send + Sync {
    fn create(&self) -> Box<dyn Planner>;
}

impl<F> PlannerFactory for F
where
    F: Fn() -> Box<dyn Planner> + Send + Sync,
{
    fn create(&self) -> Box<dyn Planner> {
        self()
    }
}
