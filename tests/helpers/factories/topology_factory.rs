use crate::engine::directory::DirectorySnapshot;
use crate::engine::topology::{Topology, build_topology};
use crate::engine::types::AgentRecord;
use crate::test_helpers::factories::{AgentRecordFactory, SchemaFactory};

/// Builds topologies through the real mapper, so tests see the same
/// ordering and capability flags the broker would.
pub struct TopologyFactory {
    schema: SchemaFactory,
    agents: Vec<AgentRecord>,
}

impl TopologyFactory {
    pub fn new() -> Self {
        Self {
            schema: SchemaFactory::new(),
            agents: Vec::new(),
        }
    }

    pub fn with_table(mut self, name: &str) -> Self {
        self.schema = self.schema.with_table(name);
        self
    }

    pub fn with_collectors(mut self, ids: &[u128]) -> Self {
        self.agents
            .extend(ids.iter().map(|n| AgentRecordFactory::collector(*n).create()));
        self
    }

    pub fn with_aggregators(mut self, ids: &[u128]) -> Self {
        self.agents
            .extend(ids.iter().map(|n| AgentRecordFactory::aggregator(*n).create()));
        self
    }

    pub fn snapshot(self) -> DirectorySnapshot {
        DirectorySnapshot {
            schema: self.schema.create(),
            agents: self.agents,
        }
    }

    pub fn create(self) -> Topology {
        build_topology(&self.snapshot())
    }
}
