//! Error types for baseball-mcp
//!
//! All fallible operations in the workspace funnel into this enum.
//! Soft conditions (degraded store, undecodable cache blob) are not errors
//! and never show up here.

use crate::cache::DataKind;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// baseball-mcp error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Storage
    // ========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    // ========================================================================
    // Caller input
    // ========================================================================
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // Upstream data provider
    // ========================================================================
    #[error("Failed to fetch {kind} ({context}): {message}")]
    Upstream {
        kind: DataKind,
        context: String,
        message: String,
    },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // ========================================================================
    // RPC layer
    // ========================================================================
    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("{0}")]
    ResourceNotFound(String),

    // ========================================================================
    // External error conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    // ========================================================================
    // Other
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_) | Error::Http(_))
    }

    /// Whether the message is safe and meaningful to show to the caller verbatim
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::InvalidInput(_)
                | Error::Upstream { .. }
                | Error::ToolNotFound(_)
                | Error::ResourceNotFound(_)
        )
    }

    /// Validation error helper
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Upstream failure helper, carrying which kind and which parameters failed
    pub fn upstream(
        kind: DataKind,
        context: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Error::Upstream {
            kind,
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_names_kind_and_context() {
        let err = Error::upstream(DataKind::Schedule, "team=ATL season=2024", "timed out");
        let text = err.to_string();
        assert!(text.contains("schedule"));
        assert!(text.contains("team=ATL season=2024"));
        assert!(text.contains("timed out"));
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = Error::validation("end_date must be on or after start_date");
        assert_eq!(err.to_string(), "end_date must be on or after start_date");
        assert!(!err.is_retryable());
    }
}
