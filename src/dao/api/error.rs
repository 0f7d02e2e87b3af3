//! Error types shared by the game API clients.

use thiserror::Error;

/// Convenient result alias returning [`TransportError`] failures.
pub type ApiResult<T> = Result<T, TransportError>;

/// Failures that prevent a request from reaching the server or its reply from coming back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Required environment variable is missing.
    #[error("missing game API environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[cfg(feature = "http-api")]
    #[error("failed to build game API client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or the connection dropped.
    #[cfg(feature = "http-api")]
    #[error("failed to send game API request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Reading the response body failed.
    #[cfg(feature = "http-api")]
    #[error("failed to read game API response body for `{path}`")]
    ReadBody {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// Transport without a concrete backend (used by in-process fakes).
    #[error("game API unreachable: {0}")]
    Unreachable(String),
}
