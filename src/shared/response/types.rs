use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// HTTP-style status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalError,
    ServiceUnavailable,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalError => 500,
            StatusCode::ServiceUnavailable => 503,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalError => "Internal Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

impl From<StatusCode> for hyper::StatusCode {
    fn from(status: StatusCode) -> Self {
        hyper::StatusCode::from_u16(status.code()).unwrap_or(hyper::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[derive(Debug, Clone)]
pub enum ResponseBody {
    Lines(Vec<String>),
    JsonArray(Vec<Value>),
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub message: String,
    pub body: ResponseBody,
    pub count: usize,
}

impl Response {
    pub fn ok_lines(lines: impl IntoIterator<Item = String>) -> Self {
        let lines: Vec<String> = lines.into_iter().collect();
        Self {
            status: StatusCode::Ok,
            count: lines.len(),
            message: "OK".to_string(),
            body: ResponseBody::Lines(lines),
        }
    }

    pub fn ok_json(rows: Vec<Value>) -> Self {
        Self {
            status: StatusCode::Ok,
            count: rows.len(),
            message: "OK".to_string(),
            body: ResponseBody::JsonArray(rows),
        }
    }

    /// A single serializable value as the only result. Serialization
    /// failures become an internal error response.
    pub fn ok_value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => Self::ok_json(vec![value]),
            Err(e) => Self::error(StatusCode::InternalError, format!("serialization failed: {e}")),
        }
    }

    pub fn error(code: StatusCode, message: impl ToString) -> Self {
        Self {
            status: code,
            count: 0,
            message: message.to_string(),
            body: ResponseBody::Lines(vec![]),
        }
    }
}
