use thiserror::Error;

use crate::{config::Messages, dao::api::TransportError};

/// Why a controller request did not produce a usable reply.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The request never completed (network unreachable, connection dropped).
    #[error("transport failure")]
    Transport(#[from] TransportError),
    /// The server refused the request (validation or business rule).
    #[error("request rejected with status {status}")]
    Rejected {
        /// HTTP status returned by the server.
        status: u16,
        /// Server-provided `error` field, when present.
        message: Option<String>,
    },
    /// A success status arrived without a usable JSON body.
    #[error("malformed reply from `{path}`")]
    MalformedBody {
        /// Endpoint that replied.
        path: &'static str,
    },
    /// A success body did not match the expected shape.
    #[error("failed to decode reply from `{path}`")]
    Decode {
        /// Endpoint that replied.
        path: &'static str,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ControllerError {
    /// The string shown to the user: the server's message when it sent one, else a fallback.
    pub fn user_message(&self, messages: &Messages) -> String {
        match self {
            ControllerError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ControllerError::Rejected { .. } => messages.request_failed.clone(),
            ControllerError::Transport(_)
            | ControllerError::MalformedBody { .. }
            | ControllerError::Decode { .. } => messages.network_error.clone(),
        }
    }
}

/// A device capability (audio, vibration) could not be used.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The platform has no such capability.
    #[error("capability not supported on this device")]
    Unsupported,
    /// The device reported a failure.
    #[error("device failure")]
    Device(#[source] std::io::Error),
}
