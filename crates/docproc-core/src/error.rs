//! Shared error type across docproc crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Unknown document or route.
    NotFound,
    /// Payload exceeds the configured upload limit.
    PayloadTooLarge,
    /// Processing capacity exhausted or service shutting down.
    Unavailable,
    /// Request exceeded the processing time bound.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code paired with this client code.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::BadRequest => 400,
            ClientCode::NotFound => 404,
            ClientCode::PayloadTooLarge => 413,
            ClientCode::Unavailable => 503,
            ClientCode::Timeout => 504,
            ClientCode::Internal => 500,
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, DocProcError>;

/// Unified error type used by core, gateway, and document services.
#[derive(Debug, Error)]
pub enum DocProcError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("internal: {0}")]
    Internal(String),
}

impl DocProcError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            DocProcError::BadRequest(_) => ClientCode::BadRequest,
            DocProcError::NotFound(_) => ClientCode::NotFound,
            DocProcError::PayloadTooLarge { .. } => ClientCode::PayloadTooLarge,
            DocProcError::Unavailable(_) => ClientCode::Unavailable,
            DocProcError::Timeout(_) => ClientCode::Timeout,
            DocProcError::Internal(_) => ClientCode::Internal,
        }
    }
}
