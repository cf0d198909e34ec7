//! Error types and error codes for Carlettos
//!
//! - `CarlettosError`: application error enum, carried inside `anyhow::Error`
//! - `ErrorCode`: structured codes placed in error response envelopes

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum CarlettosError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl CarlettosError {
    /// Shorthand for wrapping a `NotFound` into `anyhow::Error`
    pub fn not_found(what: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(CarlettosError::NotFound(what.into()))
    }

    /// Shorthand for wrapping an `IllegalArgument` into `anyhow::Error`
    pub fn illegal_argument(message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(CarlettosError::IllegalArgument(message.into()))
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};
