mod fanout;
mod session;
mod traits;

#[cfg(test)]
mod session_test;

pub use fanout::{FanoutPlanner, FanoutPlannerFactory};
pub use session::PlannerSession;
pub use traits::{Planner, PlannerFactory};
