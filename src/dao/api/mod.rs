pub mod config;
pub mod error;
#[cfg(feature = "http-api")]
pub mod http;

use futures::future::BoxFuture;
use serde_json::Value;

pub use self::error::{ApiResult, TransportError};

/// Raw reply from the game server, before any classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `None` when the body was empty or not valid JSON.
    pub body: Option<Value>,
}

impl ApiReply {
    /// Build a reply carrying a JSON body.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Build a reply without a usable body.
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Server-provided `error` message, if any.
    pub fn error_message(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

/// A mutating request: endpoint path plus form-encoded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    /// Server path, e.g. `/gty/award`.
    pub path: &'static str,
    /// Form fields sent as `application/x-www-form-urlencoded`.
    pub form: Vec<(&'static str, String)>,
}

impl FormRequest {
    /// Request without a body.
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            form: Vec::new(),
        }
    }

    /// Append a form field.
    pub fn field(mut self, name: &'static str, value: impl ToString) -> Self {
        self.form.push((name, value.to_string()));
        self
    }
}

/// Abstraction over the session-scoped party-games HTTP API.
///
/// Implementations carry the session credential themselves; callers only see paths.
pub trait GameApi: Send + Sync {
    fn get(&self, path: &'static str) -> BoxFuture<'static, ApiResult<ApiReply>>;
    fn post(&self, request: FormRequest) -> BoxFuture<'static, ApiResult<ApiReply>>;
}
