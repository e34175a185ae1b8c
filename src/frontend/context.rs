use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::broker::{QueryBroker, run_result_pump};
use crate::engine::agent::spawn_local_agents;
use crate::engine::bus::{ChannelBus, MessageBus};
use crate::engine::directory::StaticDirectory;
use crate::engine::planner::FanoutPlannerFactory;
use crate::frontend::server_state::ServerState;
use crate::shared::config::Settings;

#[derive(Clone)]
pub struct FrontendContext {
    pub broker: Arc<QueryBroker>,
    pub server_state: Arc<ServerState>,
}

impl FrontendContext {
    pub fn new(broker: Arc<QueryBroker>, max_in_flight_queries: usize) -> Arc<Self> {
        let server_state = Arc::new(ServerState::new(
            Arc::clone(broker.registry()),
            max_in_flight_queries,
        ));
        Arc::new(Self {
            broker,
            server_state,
        })
    }

    /// Wires the broker from settings. With `broker.local_agents` set, an
    /// in-process agent is started for every directory entry and its
    /// results are pumped back through the broker's ingress.
    pub fn from_settings(settings: &Settings) -> Arc<Self> {
        let directory = Arc::new(StaticDirectory::from_config(&settings.directory));
        let bus = Arc::new(ChannelBus::new(settings.broker.agent_channel_capacity));

        let bus_handle: Arc<dyn MessageBus> = bus.clone();

        let broker = Arc::new(QueryBroker::new(
            directory,
            Arc::new(FanoutPlannerFactory),
            bus_handle,
            settings.broker.query_timeout(),
        ));

        if settings.broker.local_agents {
            let (results_tx, results_rx) = mpsc::channel(settings.broker.result_channel_capacity);
            spawn_local_agents(&bus, &settings.directory.agents, results_tx);
            tokio::spawn(run_result_pump(results_rx, broker.ingress()));
            info!(
                target: "query_broker::frontend",
                agents = settings.directory.agents.len(),
                "Local agents enabled"
            );
        }

        Self::new(broker, settings.server.max_in_flight_queries)
    }
}
