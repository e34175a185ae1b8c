use serde::{Deserialize, Serialize};

use crate::engine::errors::IngressError;
use crate::engine::execution::Delivery;

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Reply to `POST /agent-result`. Refused deliveries are still a
/// successful exchange from the agent's point of view.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResultAck {
    pub accepted: bool,
    pub completed: bool,
    pub reason: Option<String>,
}

impl From<Result<Delivery, IngressError>> for ResultAck {
    fn from(outcome: Result<Delivery, IngressError>) -> Self {
        match outcome {
            Ok(delivery) => Self {
                accepted: true,
                completed: delivery == Delivery::Completed,
                reason: None,
            },
            Err(e) => Self {
                accepted: false,
                completed: false,
                reason: Some(e.to_string()),
            },
        }
    }
}
