mod executions;


pub use executions::{ExecutionRegistry, Registration};
