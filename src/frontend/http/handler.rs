use http_body_util::BodyExt;
use hyper::{Request, Response, body::Incoming};
use std::{convert::Infallible, sync::Arc};
use tracing::warn;

use crate::frontend::context::FrontendContext;
use crate::shared::response::{Response as ResponseType, StatusCode};

use super::dispatcher::{dispatch, render};

struct HttpHandler {
    ctx: Arc<FrontendContext>,
}

impl HttpHandler {
    fn new(ctx: Arc<FrontendContext>) -> Self {
        Self { ctx }
    }

    async fn handle(&self, req: Request<Incoming>) -> Result<Response<String>, Infallible> {
        let (parts, body) = req.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(target: "query_broker::http", error = %e, "Failed to read request body");
                return Ok(render(&ResponseType::error(
                    StatusCode::BadRequest,
                    "Failed to read request body",
                )));
            }
        };

        Ok(dispatch(&parts.method, parts.uri.path(), body, &self.ctx).await)
    }
}

pub async fn handle_request(
    req: Request<Incoming>,
    ctx: Arc<FrontendContext>,
) -> Result<Response<String>, Infallible> {
    let handler = HttpHandler::new(ctx);
    handler.handle(req).await
}
