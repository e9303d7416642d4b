//! Failure taxonomy for a lookup cycle.
//!
//! Every variant's `Display` output is the message shown in the error banner,
//! so callers can render `err.to_string()` directly.

use thiserror::Error;

/// Why a lookup cycle ended without a place name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No location capability exists in this environment.
    #[error("your browser does not support location retrieval")]
    LocationUnsupported,

    #[error("location access is not permitted")]
    PermissionDenied,

    #[error("current position could not be determined")]
    PositionUnavailable,

    #[error("location retrieval timed out")]
    Timeout,

    #[error("an error occurred while retrieving location")]
    UnknownLocationError,

    /// No usable credential for the geocoding service.
    #[error("mapping service access is not configured")]
    ServiceMisconfigured,

    /// The service answered with a status other than `OK`.
    #[error("address retrieval failed: {0}")]
    RemoteLookupFailed(String),

    /// Network failure or an unusable response body. `detail` is for logs only.
    #[error("an error occurred during the request to the API")]
    RequestFailed { detail: String },
}

impl LookupError {
    pub fn request_failed(detail: impl ToString) -> Self {
        Self::RequestFailed {
            detail: detail.to_string(),
        }
    }
}

/// Failure reported by a location source, shaped like a platform error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("location error {code}: {message}")]
pub struct PositionError {
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(Self::PERMISSION_DENIED, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Self::POSITION_UNAVAILABLE, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(Self::TIMEOUT, message)
    }
}

impl From<PositionError> for LookupError {
    fn from(err: PositionError) -> Self {
        match err.code {
            PositionError::PERMISSION_DENIED => LookupError::PermissionDenied,
            PositionError::POSITION_UNAVAILABLE => LookupError::PositionUnavailable,
            PositionError::TIMEOUT => LookupError::Timeout,
            _ => LookupError::UnknownLocationError,
        }
    }
}
