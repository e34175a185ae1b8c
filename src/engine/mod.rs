pub mod agent;
pub mod bus;
pub mod directory;
pub mod errors;
pub mod execution;
pub mod planner;
pub mod registry;
pub mod topology;
pub mod types;


pub use errors::*;
