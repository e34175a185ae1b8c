mod mapper;


pub use mapper::{Topology, build_topology, describe_agent};
