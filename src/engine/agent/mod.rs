pub mod worker;

#[cfg(test)]
mod worker_test;

pub use worker::{LocalAgent, run_agent_loop, spawn_local_agents};
