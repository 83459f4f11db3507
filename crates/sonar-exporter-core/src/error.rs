//! Shared error type across sonar-exporter crates.

use thiserror::Error;

/// Stable error codes, used in logs and as the poll counter's `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration missing or unparseable.
    Config,
    /// An upstream call failed (network, status, or body).
    FetchFailed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("config: {0}")]
    Config(String),
    #[error("fetch failed ({endpoint}): {reason}")]
    Fetch { endpoint: String, reason: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Build a fetch error for one upstream endpoint.
    pub fn fetch(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ExporterError::Fetch {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExporterError::Config(_) => ErrorCode::Config,
            ExporterError::Fetch { .. } => ErrorCode::FetchFailed,
            ExporterError::Internal(_) => ErrorCode::Internal,
        }
    }
}
