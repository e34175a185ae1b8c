mod coordinator;
mod factory;
mod state;
mod traits;

#[cfg(test)]
mod state_test;

pub use coordinator::ExecutionCoordinator;
pub use factory::CoordinatorFactory;
pub use state::ExecutionState;
pub use traits::{Delivery, Execution, ExecutionFactory};
