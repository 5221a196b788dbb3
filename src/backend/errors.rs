//! Backend error types.
//!
//! Only construction-time operations can fail here. Request-time failures
//! never become errors: the client downgrades them into the returned
//! `ApiResponse` (status 0 for transport failures, the raw body under
//! `{"text": …}` for non-JSON responses).

use thiserror::Error;

/// Errors that can occur while setting up the backend boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Configuration loading or validation error.
    #[error("config error: {reason}")]
    Config { reason: String },

    /// Failed to build the underlying HTTP client.
    #[error("http client build failed: {reason}")]
    ClientBuild { reason: String },
}
