use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use super::state::ExecutionState;
use super::traits::{Delivery, Execution};
use crate::engine::bus::{AgentRequest, MessageBus};
use crate::engine::errors::ExecutionError;
use crate::engine::types::{AgentId, AgentResponse, AgentResult, QueryId, SubPlan};

const LOG_TARGET: &str = "query_broker::execution";

/// Scatter-gather coordinator for one query.
///
/// Deliveries may arrive on any task, in any order, before or after
/// `dispatch` returns, and more than once per agent. Everything mutable
/// lives behind `inner`, which is never held across an `.await`. The
/// completion signal is flipped once, under that lock, by whichever
/// delivery fills the last missing slot.
pub struct ExecutionCoordinator {
    query_id: QueryId,
    targets: BTreeSet<AgentId>,
    bus: Arc<dyn MessageBus>,
    inner: Mutex<Inner>,
    done: watch::Sender<bool>,
}

struct Inner {
    state: ExecutionState,
    results: BTreeMap<AgentId, AgentResult>,
    signalled: bool,
}

impl ExecutionCoordinator {
    pub fn new(bus: Arc<dyn MessageBus>, query_id: QueryId, targets: Vec<AgentId>) -> Self {
        let targets: BTreeSet<AgentId> = targets.into_iter().collect();
        // Nothing to wait for.
        let signalled = targets.is_empty();
        let (done, _) = watch::channel(signalled);

        debug!(
            target: LOG_TARGET,
            %query_id,
            targets = targets.len(),
            "Execution created"
        );

        Self {
            query_id,
            targets,
            bus,
            inner: Mutex::new(Inner {
                state: ExecutionState::Created,
                results: BTreeMap::new(),
                signalled,
            }),
            done,
        }
    }

    pub fn received_count(&self) -> usize {
        self.inner.lock().results.len()
    }

    pub fn result_for(&self, agent_id: &AgentId) -> Option<AgentResult> {
        self.inner.lock().results.get(agent_id).cloned()
    }

    /// Targets that have not reported yet, ascending.
    pub fn missing(&self) -> Vec<AgentId> {
        let inner = self.inner.lock();
        self.missing_locked(&inner)
    }

    fn missing_locked(&self, inner: &Inner) -> Vec<AgentId> {
        self.targets
            .iter()
            .filter(|id| !inner.results.contains_key(id))
            .copied()
            .collect()
    }

    fn assemble(&self, inner: &Inner) -> Vec<AgentResponse> {
        self.targets
            .iter()
            .map(|id| match inner.results.get(id) {
                Some(result) => AgentResponse::responded(*id, result.payload.clone()),
                None => AgentResponse::no_response(*id),
            })
            .collect()
    }

    fn advance(
        &self,
        inner: &mut Inner,
        from: ExecutionState,
        to: ExecutionState,
    ) -> Result<(), ExecutionError> {
        if inner.state != from || !from.can_transition_to(to) {
            return Err(ExecutionError::InvalidState {
                query_id: self.query_id,
                expected: from,
                found: inner.state,
            });
        }
        debug!(target: LOG_TARGET, query_id = %self.query_id, ?from, ?to, "State change");
        inner.state = to;
        Ok(())
    }

    fn fail_dispatch(&self) {
        let mut inner = self.inner.lock();
        if let Err(e) = self.advance(&mut inner, ExecutionState::Dispatching, ExecutionState::Failed)
        {
            error!(target: LOG_TARGET, query_id = %self.query_id, error = %e, "Could not mark dispatch failed");
        }
    }
}

#[async_trait]
impl Execution for ExecutionCoordinator {
    fn query_id(&self) -> QueryId {
        self.query_id
    }

    fn targets(&self) -> Vec<AgentId> {
        self.targets.iter().copied().collect()
    }

    fn state(&self) -> ExecutionState {
        self.inner.lock().state
    }

    async fn dispatch(&self, plans: BTreeMap<AgentId, SubPlan>) -> Result<(), ExecutionError> {
        {
            let mut inner = self.inner.lock();
            self.advance(&mut inner, ExecutionState::Created, ExecutionState::Dispatching)?;

            if !plans.keys().eq(self.targets.iter()) {
                self.advance(&mut inner, ExecutionState::Dispatching, ExecutionState::Failed)?;
                return Err(ExecutionError::PlanMismatch {
                    query_id: self.query_id,
                });
            }
        }

        for (agent_id, plan) in plans {
            let request = AgentRequest {
                query_id: self.query_id,
                plan,
            };
            if let Err(source) = self.bus.send(&agent_id, request).await {
                error!(
                    target: LOG_TARGET,
                    query_id = %self.query_id,
                    %agent_id,
                    error = %source,
                    "Dispatch failed"
                );
                self.fail_dispatch();
                return Err(ExecutionError::Dispatch { agent_id, source });
            }
        }

        let mut inner = self.inner.lock();
        self.advance(&mut inner, ExecutionState::Dispatching, ExecutionState::Awaiting)?;
        info!(
            target: LOG_TARGET,
            query_id = %self.query_id,
            targets = self.targets.len(),
            already_received = inner.results.len(),
            "Sub-plans dispatched"
        );
        Ok(())
    }

    fn add_result(&self, result: AgentResult) -> Result<Delivery, ExecutionError> {
        let agent_id = result.agent_id;
        if !self.targets.contains(&agent_id) {
            warn!(
                target: LOG_TARGET,
                query_id = %self.query_id,
                %agent_id,
                "Rejecting result from agent outside the target set"
            );
            return Err(ExecutionError::UnknownAgent {
                query_id: self.query_id,
                agent_id,
            });
        }

        let mut inner = self.inner.lock();
        if inner.results.insert(agent_id, result).is_some() {
            debug!(
                target: LOG_TARGET,
                query_id = %self.query_id,
                %agent_id,
                "Duplicate result, keeping newest payload"
            );
            return Ok(Delivery::Duplicate);
        }

        // A timed-out or failed execution has already answered its caller.
        if matches!(
            inner.state,
            ExecutionState::TimedOut | ExecutionState::Failed
        ) {
            debug!(
                target: LOG_TARGET,
                query_id = %self.query_id,
                %agent_id,
                state = ?inner.state,
                "Late result recorded after execution settled"
            );
            return Ok(Delivery::Accepted);
        }

        if !inner.signalled && inner.results.len() == self.targets.len() {
            inner.signalled = true;
            self.done.send_replace(true);
            debug!(
                target: LOG_TARGET,
                query_id = %self.query_id,
                %agent_id,
                "Last outstanding result received"
            );
            return Ok(Delivery::Completed);
        }

        debug!(
            target: LOG_TARGET,
            query_id = %self.query_id,
            %agent_id,
            received = inner.results.len(),
            expected = self.targets.len(),
            "Result accepted"
        );
        Ok(Delivery::Accepted)
    }

    async fn await_completion(
        &self,
        deadline: Instant,
    ) -> Result<Vec<AgentResponse>, ExecutionError> {
        {
            let inner = self.inner.lock();
            if inner.state != ExecutionState::Awaiting {
                return Err(ExecutionError::InvalidState {
                    query_id: self.query_id,
                    expected: ExecutionState::Awaiting,
                    found: inner.state,
                });
            }
        }

        let mut done = self.done.subscribe();
        if timeout_at(deadline, done.wait_for(|signalled| *signalled))
            .await
            .is_err()
        {
            debug!(target: LOG_TARGET, query_id = %self.query_id, "Deadline reached");
        }

        // The signal is re-read under the lock so a delivery racing the
        // deadline still counts as completion.
        let mut inner = self.inner.lock();
        if inner.signalled {
            self.advance(&mut inner, ExecutionState::Awaiting, ExecutionState::Completed)?;
            info!(
                target: LOG_TARGET,
                query_id = %self.query_id,
                agents = self.targets.len(),
                "Execution completed"
            );
            return Ok(self.assemble(&inner));
        }

        self.advance(&mut inner, ExecutionState::Awaiting, ExecutionState::TimedOut)?;
        let missing = self.missing_locked(&inner);
        warn!(
            target: LOG_TARGET,
            query_id = %self.query_id,
            missing = missing.len(),
            received = inner.results.len(),
            "Execution timed out"
        );
        Err(ExecutionError::Timeout {
            query_id: self.query_id,
            missing,
            partial: self.assemble(&inner),
        })
    }
}
