pub mod context;
pub mod http;
pub mod server_state;


use context::FrontendContext;
use std::sync::Arc;

pub async fn start_all(ctx: Arc<FrontendContext>, http_addr: &str) -> anyhow::Result<()> {
    http::listener::run_http_server(ctx, http_addr).await
}
