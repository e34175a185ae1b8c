use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

use crate::engine::errors::{ExecutionError, IngressError};
use crate::engine::execution::Delivery;
use crate::engine::registry::ExecutionRegistry;
use crate::engine::types::AgentResult;

const LOG_TARGET: &str = "query_broker::ingress";

/// Routes results pushed by agents to the execution that is waiting
/// for them.
#[derive(Clone)]
pub struct ResultIngress {
    registry: Arc<ExecutionRegistry>,
}

impl ResultIngress {
    pub fn new(registry: Arc<ExecutionRegistry>) -> Self {
        Self { registry }
    }

    pub fn handle(&self, result: AgentResult) -> Result<Delivery, IngressError> {
        let query_id = result.query_id;
        let agent_id = result.agent_id;

        let outcome = match self.registry.lookup(&query_id) {
            Some(execution) => execution.add_result(result).map_err(|e| match e {
                ExecutionError::UnknownAgent { query_id, agent_id } => {
                    IngressError::UnknownAgent { query_id, agent_id }
                }
                other => IngressError::Rejected {
                    query_id,
                    reason: other.to_string(),
                },
            }),
            None => Err(IngressError::UnknownQuery(query_id)),
        };

        match &outcome {
            Ok(delivery) => {
                debug!(target: LOG_TARGET, %query_id, %agent_id, ?delivery, "Result delivered");
            }
            Err(e) => e.log(),
        }
        outcome
    }
}

/// Drains `rx`, handing each result to the ingress on its own task.
/// Returns once every sender is gone.
pub async fn run_result_pump(mut rx: Receiver<AgentResult>, ingress: ResultIngress) {
    info!(target: LOG_TARGET, "Result pump started");

    while let Some(result) = rx.recv().await {
        let ingress = ingress.clone();
        tokio::spawn(async move {
            // Failures are logged by `handle` and are not fatal.
            let _ = ingress.handle(result);
        });
    }

    info!(target: LOG_TARGET, "Result pump stopped");
}
