use bytes::Bytes;
use hyper::{Method, Response, header};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::engine::types::AgentResult;
use crate::frontend::context::FrontendContext;
use crate::frontend::http::json_command::{QueryRequest, ResultAck};
use crate::shared::response::{JsonRenderer, Renderer, Response as ResponseType, StatusCode};

const LOG_TARGET: &str = "query_broker::http";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Query,
    Agents,
    Schemas,
    AgentResult,
}

impl Route {
    fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/query" => Some(Route::Query),
            "/agents" => Some(Route::Agents),
            "/schemas" => Some(Route::Schemas),
            "/agent-result" => Some(Route::AgentResult),
            _ => None,
        }
    }

    fn method(&self) -> Method {
        match self {
            Route::Query | Route::AgentResult => Method::POST,
            Route::Agents | Route::Schemas => Method::GET,
        }
    }
}

/// Routes one fully read request.
pub async fn dispatch(
    method: &Method,
    path: &str,
    body: Bytes,
    ctx: &FrontendContext,
) -> Response<String> {
    if ctx.server_state.is_shutting_down() {
        return render(&ResponseType::error(
            StatusCode::ServiceUnavailable,
            "Server is shutting down",
        ));
    }

    let Some(route) = Route::from_path(path) else {
        return render(&ResponseType::error(StatusCode::NotFound, format!("No route for {path}")));
    };
    if *method != route.method() {
        return render(&ResponseType::error(
            StatusCode::MethodNotAllowed,
            format!("{path} expects {}", route.method()),
        ));
    }

    let response = match route {
        Route::Query => handle_query(body, ctx).await,
        Route::Agents => match ctx.broker.agent_info().await {
            Ok(agents) => ResponseType::ok_json(
                agents
                    .iter()
                    .filter_map(|a| serde_json::to_value(a).ok())
                    .collect(),
            ),
            Err(e) => internal_error(e),
        },
        Route::Schemas => match ctx.broker.schemas().await {
            Ok(schema) => ResponseType::ok_value(&schema),
            Err(e) => internal_error(e),
        },
        Route::AgentResult => handle_agent_result(body, ctx),
    };
    render(&response)
}

async fn handle_query(body: Bytes, ctx: &FrontendContext) -> ResponseType {
    let Some(_admission) = ctx.server_state.try_admit() else {
        warn!(
            target: LOG_TARGET,
            in_flight = ctx.server_state.in_flight(),
            "Refusing query, too many in flight"
        );
        return ResponseType::error(
            StatusCode::ServiceUnavailable,
            "Too many queries in flight, please retry later",
        );
    };

    let request: QueryRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match ctx.broker.execute_query(&request.query).await {
        Ok(response) => ResponseType::ok_value(&response),
        Err(e) => internal_error(e),
    }
}

fn handle_agent_result(body: Bytes, ctx: &FrontendContext) -> ResponseType {
    let result: AgentResult = match parse_body(&body) {
        Ok(result) => result,
        Err(response) => return response,
    };
    debug!(
        target: LOG_TARGET,
        query_id = %result.query_id,
        agent_id = %result.agent_id,
        "Agent result received"
    );
    ResponseType::ok_value(&ResultAck::from(ctx.broker.receive_agent_result(result)))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ResponseType> {
    serde_json::from_slice(body).map_err(|e| {
        ResponseType::error(StatusCode::BadRequest, format!("Invalid JSON body: {e}"))
    })
}

fn internal_error(e: impl std::fmt::Display) -> ResponseType {
    error!(target: LOG_TARGET, error = %e, "Request failed");
    ResponseType::error(StatusCode::InternalError, format!("Execution error: {e}"))
}

pub fn render(resp: &ResponseType) -> Response<String> {
    let renderer = JsonRenderer;
    let body = renderer.render(resp);
    let mut response = Response::new(String::from_utf8_lossy(&body).into_owned());
    *response.status_mut() = resp.status.into();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static(renderer.content_type()),
    );
    response
}
