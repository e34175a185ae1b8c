pub mod ingress;
pub mod service;


pub use ingress::{ResultIngress, run_result_pump};
pub use service::QueryBroker;
