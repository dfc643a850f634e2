//! Error types
//!
//! Defines domain-specific error types for each module of the sync server.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Archive store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The caller did not supply a usable archive name or payload.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("archive not found: {0}")]
    NotFound(String),

    /// The stored file exists but is not valid JSON.
    #[error("archive {name} is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A filesystem operation failed. Carries the real path, so it is only
    /// ever logged.
    #[error("failed to {action} {}: {source}", path.display())]
    StorageUnavailable {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unexpected storage failure: {0}")]
    Unexpected(String),
}

impl StorageError {
    pub(crate) fn unavailable(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        StorageError::StorageUnavailable {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid access password")]
    InvalidPassword,
}

/// Error returned by every HTTP handler; rendered as the failure envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Root path access, which never serves data.
    #[error("access denied, use the correct API path and password")]
    AccessDenied,

    /// The request body or query string could not be decoded.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// The request body exceeded the configured size limit.
    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("no such route")]
    UnknownRoute,

    /// The path exists but does not accept the request's method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// A handler panicked.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Errors that stop the server from starting or keep it from serving
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("network error: {0}")]
    Io(#[from] io::Error),
}
