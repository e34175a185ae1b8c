use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::ingress::ResultIngress;
use crate::engine::bus::MessageBus;
use crate::engine::directory::AgentDirectory;
use crate::engine::errors::{BrokerError, ExecutionError, IngressError};
use crate::engine::execution::{CoordinatorFactory, Delivery, ExecutionFactory};
use crate::engine::planner::{Planner, PlannerFactory, PlannerSession};
use crate::engine::registry::ExecutionRegistry;
use crate::engine::topology::{Topology, build_topology};
use crate::engine::types::{
    AgentId, AgentRecord, AgentResult, DistributedPlan, QueryId, QueryResponse, Schema,
};

const LOG_TARGET: &str = "query_broker::broker";

/// Client-facing entry point: plans a query, scatters it over the bus and
/// gathers the agents' answers into one response.
pub struct QueryBroker {
    directory: Arc<dyn AgentDirectory>,
    planners: Arc<dyn PlannerFactory>,
    bus: Arc<dyn MessageBus>,
    executions: Arc<dyn ExecutionFactory>,
    registry: Arc<ExecutionRegistry>,
    ingress: ResultIngress,
    query_timeout: Duration,
}

impl QueryBroker {
    pub fn new(
        directory: Arc<dyn AgentDirectory>,
        planners: Arc<dyn PlannerFactory>,
        bus: Arc<dyn MessageBus>,
        query_timeout: Duration,
    ) -> Self {
        let registry = Arc::new(ExecutionRegistry::new());
        Self {
            directory,
            planners,
            bus,
            executions: Arc::new(CoordinatorFactory),
            ingress: ResultIngress::new(Arc::clone(&registry)),
            registry,
            query_timeout,
        }
    }

    pub fn with_execution_factory(mut self, executions: Arc<dyn ExecutionFactory>) -> Self {
        self.executions = executions;
        self
    }

    /// Shares an existing registry, e.g. with another ingress path.
    pub fn with_registry(mut self, registry: Arc<ExecutionRegistry>) -> Self {
        self.ingress = ResultIngress::new(Arc::clone(&registry));
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<ExecutionRegistry> {
        &self.registry
    }

    pub fn ingress(&self) -> ResultIngress {
        self.ingress.clone()
    }

    /// Runs `query` with a fresh planner from the factory.
    pub async fn execute_query(&self, query: &str) -> Result<QueryResponse, BrokerError> {
        self.execute_query_with_planner(query, self.planners.create())
            .await
    }

    /// Runs `query` with a caller-supplied planner. The planner is
    /// released before any sub-plan is dispatched, whatever the outcome.
    pub async fn execute_query_with_planner(
        &self,
        query: &str,
        planner: Box<dyn Planner>,
    ) -> Result<QueryResponse, BrokerError> {
        let session = PlannerSession::new(planner);
        let started = std::time::Instant::now();
        let query_id = QueryId::new();
        info!(target: LOG_TARGET, %query_id, "Running query");

        let snapshot = self.directory.snapshot().await?;
        let topology = build_topology(&snapshot);
        debug!(
            target: LOG_TARGET,
            %query_id,
            collectors = topology.collectors().count(),
            aggregators = topology.aggregators().count(),
            "Topology built"
        );

        let plans = match compile(session, &topology, query)? {
            DistributedPlan::Compiled(plans) => plans,
            DistributedPlan::Rejected(diagnostics) => {
                info!(
                    target: LOG_TARGET,
                    %query_id,
                    errors = diagnostics.len(),
                    duration = ?started.elapsed(),
                    "Query failed to compile"
                );
                return Ok(QueryResponse::compile_failed(query_id, diagnostics));
            }
        };

        let targets: Vec<AgentId> = plans.keys().copied().collect();
        let execution = self
            .executions
            .create(Arc::clone(&self.bus), query_id, targets);
        // Registered before dispatch: an agent may answer before the last
        // send returns.
        let registration = self.registry.register_scoped(Arc::clone(&execution))?;

        match execution.dispatch(plans).await {
            Ok(()) => {}
            Err(ExecutionError::Dispatch { agent_id, source }) => {
                warn!(
                    target: LOG_TARGET,
                    %query_id,
                    %agent_id,
                    error = %source,
                    "Query aborted during dispatch"
                );
                return Ok(QueryResponse::dispatch_failed(query_id, agent_id, source));
            }
            Err(e) => return Err(e.into()),
        }

        let deadline = Instant::now() + self.query_timeout;
        let response = match execution.await_completion(deadline).await {
            Ok(responses) => QueryResponse::completed(query_id, responses),
            Err(ExecutionError::Timeout {
                missing, partial, ..
            }) => QueryResponse::timed_out(query_id, missing, partial),
            Err(e) => return Err(e.into()),
        };
        drop(registration);

        info!(
            target: LOG_TARGET,
            %query_id,
            ok = response.is_ok(),
            duration = ?started.elapsed(),
            "Query finished"
        );
        Ok(response)
    }

    pub async fn agent_info(&self) -> Result<Vec<AgentRecord>, BrokerError> {
        Ok(self.directory.snapshot().await?.agents)
    }

    pub async fn schemas(&self) -> Result<Schema, BrokerError> {
        Ok(self.directory.snapshot().await?.schema)
    }

    pub fn receive_agent_result(&self, result: AgentResult) -> Result<Delivery, IngressError> {
        self.ingress.handle(result)
    }

    pub fn in_flight(&self) -> usize {
        self.registry.len()
    }
}

fn compile(
    mut session: PlannerSession<'_>,
    topology: &Topology,
    query: &str,
) -> Result<DistributedPlan, BrokerError> {
    let plan = session.plan(topology, query);
    session.release();
    Ok(plan?)
}
