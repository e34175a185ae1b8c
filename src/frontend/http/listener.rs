use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::frontend::context::FrontendContext;

use super::handler::handle_request;

const LOG_TARGET: &str = "query_broker::http";

pub async fn run_http_server(ctx: Arc<FrontendContext>, http_addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = http_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    serve(listener, ctx).await
}

/// Accepts connections on `listener` until shutdown is signalled.
pub async fn serve(listener: TcpListener, ctx: Arc<FrontendContext>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(target: LOG_TARGET, "HTTP server running at http://{addr}/");

    loop {
        if ctx.server_state.is_shutting_down() {
            break;
        }

        let accept_result = tokio::select! {
            result = listener.accept() => result,
            _ = async {
                // Poll the shutdown flag while waiting for a connection.
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    if ctx.server_state.is_shutting_down() {
                        break;
                    }
                }
            } => {
                info!(target: LOG_TARGET, "HTTP server shutting down, stopping accept loop");
                break;
            }
        };

        let (stream, peer_addr) = match accept_result {
            Ok(conn) => conn,
            Err(e) => {
                warn!(target: LOG_TARGET, error = %e, "Failed to accept HTTP connection");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let ctx = Arc::clone(&ctx);

        tokio::spawn(async move {
            let builder = hyper::server::conn::http1::Builder::new();
            if let Err(err) = builder
                .serve_connection(
                    io,
                    service_fn(move |req| handle_request(req, Arc::clone(&ctx))),
                )
                .await
            {
                if !err.is_incomplete_message() {
                    warn!(target: LOG_TARGET, %peer_addr, error = %err, "Error serving connection");
                }
            }
        });
    }

    info!(target: LOG_TARGET, "HTTP server shutdown complete");
    Ok(())
}
