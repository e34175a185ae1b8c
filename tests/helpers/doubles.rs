use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::broker::ResultIngress;
use crate::engine::bus::{AgentRequest, MessageBus};
use crate::engine::directory::{AgentDirectory, DirectorySnapshot};
use crate::engine::errors::{BusError, DirectoryError, PlannerError};
use crate::engine::execution::{CoordinatorFactory, Execution, ExecutionFactory};
use crate::engine::planner::Planner;
use crate::engine::topology::Topology;
use crate::engine::types::{
    AgentId, AgentResult, CompilerErrorGroup, DistributedPlan, QueryId, SubPlan,
};
use crate::test_helpers::factories::PlanFactory;

/// Bus that records every request and can be told to refuse some agents.
#[derive(Default)]
pub struct RecordingBus {
    sent: Mutex<Vec<(AgentId, AgentRequest)>>,
    refuse: BTreeSet<AgentId>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, agent_id: AgentId) -> Self {
        self.refuse.insert(agent_id);
        self
    }

    pub fn sent(&self) -> Vec<(AgentId, AgentRequest)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MessageBus for RecordingBus {
    async fn send(&self, destination: &AgentId, request: AgentRequest) -> Result<(), BusError> {
        if self.refuse.contains(destination) {
            return Err(BusError::UnknownDestination(*destination));
        }
        self.sent.lock().push((*destination, request));
        Ok(())
    }
}

/// Bus that answers every request synchronously through the ingress,
/// before `send` returns. Agents in `silent` never answer.
#[derive(Default)]
pub struct EchoBus {
    ingress: Mutex<Option<ResultIngress>>,
    silent: BTreeSet<AgentId>,
    sends: AtomicUsize,
}

impl EchoBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silent(mut self, n: u128) -> Self {
        self.silent.insert(AgentId::from_u128(n));
        self
    }

    pub fn connect(&self, ingress: ResultIngress) {
        *self.ingress.lock() = Some(ingress);
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageBus for EchoBus {
    async fn send(&self, destination: &AgentId, request: AgentRequest) -> Result<(), BusError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        if self.silent.contains(destination) {
            return Ok(());
        }
        let ingress = self.ingress.lock().clone();
        if let Some(ingress) = ingress {
            let payload = json!({ "echo": request.plan });
            let _ = ingress.handle(AgentResult::new(request.query_id, *destination, payload));
        }
        Ok(())
    }
}

#[derive(Clone)]
enum Script {
    Compiled(BTreeMap<AgentId, SubPlan>),
    Rejected(CompilerErrorGroup),
    Failing(String),
}

/// Planner returning a canned outcome and counting releases.
pub struct ScriptedPlanner {
    script: Script,
    releases: Arc<AtomicUsize>,
    plan_calls: Arc<AtomicUsize>,
}

impl ScriptedPlanner {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            releases: Arc::new(AtomicUsize::new(0)),
            plan_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn compiled(agents: &[u128]) -> Self {
        Self::with_script(Script::Compiled(PlanFactory::compiled(agents)))
    }

    pub fn rejected(errors: CompilerErrorGroup) -> Self {
        Self::with_script(Script::Rejected(errors))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_script(Script::Failing(message.to_string()))
    }

    pub fn releases(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.releases)
    }

    pub fn plan_calls(&self) -> usize {
        self.plan_calls.load(Ordering::SeqCst)
    }
}

impl Planner for ScriptedPlanner {
    fn plan(&mut self, _topology: &Topology, _query: &str) -> Result<DistributedPlan, PlannerError> {
        self.plan_calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Compiled(plans) => Ok(DistributedPlan::Compiled(plans.clone())),
            Script::Rejected(errors) => Ok(DistributedPlan::Rejected(errors.clone())),
            Script::Failing(message) => Err(PlannerError::Internal(message.clone())),
        }
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Real coordinators, but remembers every execution it created.
#[derive(Default)]
pub struct TrackingExecutionFactory {
    created: Mutex<Vec<Arc<dyn Execution>>>,
}

impl TrackingExecutionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> Vec<Arc<dyn Execution>> {
        self.created.lock().clone()
    }

    pub fn created_ids(&self) -> Vec<QueryId> {
        self.created.lock().iter().map(|e| e.query_id()).collect()
    }
}

impl ExecutionFactory for TrackingExecutionFactory {
    fn create(
        &self,
        bus: Arc<dyn MessageBus>,
        query_id: QueryId,
        targets: Vec<AgentId>,
    ) -> Arc<dyn Execution> {
        let execution = CoordinatorFactory.create(bus, query_id, targets);
        self.created.lock().push(Arc::clone(&execution));
        execution
    }
}

/// Directory whose snapshot always fails.
pub struct UnavailableDirectory;

#[async_trait]
impl AgentDirectory for UnavailableDirectory {
    async fn snapshot(&self) -> Result<DirectorySnapshot, DirectoryError> {
        Err(DirectoryError::Unavailable("metadata service down".to_string()))
    }
}
