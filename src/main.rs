use query_broker::frontend::context::FrontendContext;
use query_broker::frontend::start_all;
use query_broker::logging;
use query_broker::shared::config::CONFIG;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Arc::clone(&CONFIG);
    logging::init(&settings.logging)?;
    info!(
        target: "query_broker",
        http_addr = %settings.server.http_addr,
        agents = settings.directory.agents.len(),
        query_timeout_ms = settings.broker.query_timeout_ms,
        "Query broker is starting"
    );

    let ctx = FrontendContext::from_settings(&settings);

    let server_state = Arc::clone(&ctx.server_state);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(target: "query_broker", "Shutdown requested");
                server_state.signal_shutdown();
            }
            Err(e) => warn!(target: "query_broker", error = %e, "Could not listen for ctrl-c"),
        }
    });

    start_all(ctx, &settings.server.http_addr).await
}
