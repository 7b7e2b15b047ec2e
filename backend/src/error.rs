//! Error taxonomy of a call round trip.
//!
//! Each variant names the stage that failed, so a payload problem never
//! surfaces as a failure of the analysis function and vice versa.

use serde::{Deserialize, Serialize};

use crate::codec::{DeserializeError, SerializeError};
use crate::dispatch::LookupError;
use crate::units::UnitError;

/// Result type for call handling.
pub type ElephantResult<T> = Result<T, ElephantError>;

/// Error type for a call round trip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElephantError {
    /// Malformed routing or call target.
    #[error("InvalidRequest: {0}")]
    InvalidRequest(String),

    /// The requested module or function does not exist.
    #[error("NotFound: {0}")]
    NotFound(String),

    /// The payload could not be converted to domain objects.
    #[error("DeserializeError: {0}")]
    Deserialize(String),

    /// The analysis function itself failed.
    #[error("ElephantRuntimeError: {0}")]
    Runtime(String),

    /// The result could not be flattened into JSON.
    #[error("SerializeError: {0}")]
    Serialize(String),

    /// A fault in the server itself rather than in the request.
    #[error("InternalError: {0}")]
    Internal(String),
}

impl ElephantError {
    /// Whether the caller is to blame (request shape or computation input).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ElephantError::Internal(_))
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ElephantError::InvalidRequest(_) => "INVALID_REQUEST",
            ElephantError::NotFound(_) => "NOT_FOUND",
            ElephantError::Deserialize(_) => "DESERIALIZE_ERROR",
            ElephantError::Runtime(_) => "ELEPHANT_RUNTIME_ERROR",
            ElephantError::Serialize(_) => "SERIALIZE_ERROR",
            ElephantError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The wrapped message without the stage prefix.
    pub fn message(&self) -> &str {
        match self {
            ElephantError::InvalidRequest(msg)
            | ElephantError::NotFound(msg)
            | ElephantError::Deserialize(msg)
            | ElephantError::Runtime(msg)
            | ElephantError::Serialize(msg)
            | ElephantError::Internal(msg) => msg,
        }
    }
}

/// Error body returned by the HTTP API and read back by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl From<DeserializeError> for ElephantError {
    fn from(err: DeserializeError) -> Self {
        ElephantError::Deserialize(err.to_string())
    }
}

impl From<SerializeError> for ElephantError {
    fn from(err: SerializeError) -> Self {
        ElephantError::Serialize(err.to_string())
    }
}

impl From<LookupError> for ElephantError {
    fn from(err: LookupError) -> Self {
        ElephantError::NotFound(err.to_string())
    }
}

/// Unit errors reach the caller while the request is being read.
impl From<UnitError> for ElephantError {
    fn from(err: UnitError) -> Self {
        ElephantError::Deserialize(err.to_string())
    }
}
