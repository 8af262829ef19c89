//! Provider-specific error types
//!
//! ProviderError carries the detail of a failed upstream request and its
//! retry classification. It converts into `baseball_foundation::Error` at
//! the `StatsProvider` boundary.

use baseball_foundation::Error as FoundationError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to an upstream service
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded{}", .retry_after_ms.map(|ms| format!(", retry after {}ms", ms)).unwrap_or_default())]
    RateLimited { retry_after_ms: Option<u64> },

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Request timed out or was cut off
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Connection failed, DNS, etc.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream rejected the parameters (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown resource (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response arrived but had an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Body could not be parsed as JSON/CSV
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Client could not be constructed
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Whether the same request could succeed if sent again
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::ServerError(_)
                | ProviderError::RequestFailed(_)
                | ProviderError::Network(_)
        )
    }

    /// Wait the upstream asked for, from a 429's `Retry-After`
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited {
                retry_after_ms: Some(ms),
            } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }

    /// Turn a non-success response into an error, reading `Retry-After`
    /// (delay-seconds form only) and the body
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        Self::from_http_status(status, &body, retry_after)
    }

    /// Map a non-success HTTP status.
    ///
    /// `retry_after_secs` is the parsed `Retry-After` header, if any.
    pub fn from_http_status(status: u16, body: &str, retry_after_secs: Option<u64>) -> Self {
        let body = truncate_body(body);
        match status {
            429 => ProviderError::RateLimited {
                retry_after_ms: retry_after_secs.map(|secs| secs * 1000),
            },
            404 => ProviderError::NotFound(body),
            400..=499 => ProviderError::InvalidRequest(format!("HTTP {}: {}", status, body)),
            500..=599 => ProviderError::ServerError(format!("HTTP {}: {}", status, body)),
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::RequestFailed(format!("timed out: {}", err))
        } else if err.is_connect() {
            ProviderError::Network(err.to_string())
        } else if err.is_decode() {
            ProviderError::ParseError(err.to_string())
        } else if err.is_builder() {
            ProviderError::NotConfigured(err.to_string())
        } else {
            ProviderError::RequestFailed(err.to_string())
        }
    }
}

/// Keep error bodies (often whole HTML pages) to one readable line
fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    let line = body.trim().lines().next().unwrap_or_default();
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

// ============================================================================
// baseball_foundation::Error conversion
// ============================================================================

impl From<ProviderError> for FoundationError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::RateLimited { retry_after_ms } => FoundationError::RateLimited(
                retry_after_ms
                    .map(|ms| format!("Retry after {}ms", ms))
                    .unwrap_or_else(|| "Rate limited".to_string()),
            ),
            ProviderError::ServerError(msg) => {
                FoundationError::Provider(format!("Server error: {}", msg))
            }
            ProviderError::RequestFailed(msg) => FoundationError::Http(msg),
            ProviderError::Network(msg) => FoundationError::Http(format!("Network: {}", msg)),
            ProviderError::InvalidRequest(msg) => FoundationError::InvalidInput(msg),
            ProviderError::NotFound(msg) => FoundationError::Provider(format!("Not found: {}", msg)),
            ProviderError::InvalidResponse(msg) => {
                FoundationError::Provider(format!("Invalid response: {}", msg))
            }
            ProviderError::ParseError(msg) => {
                FoundationError::Provider(format!("Parse error: {}", msg))
            }
            ProviderError::NotConfigured(msg) => FoundationError::Config(msg),
            ProviderError::Unknown(msg) => FoundationError::Provider(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            ProviderError::from_http_status(429, "", Some(3)),
            ProviderError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
        assert!(matches!(
            ProviderError::from_http_status(503, "down", None),
            ProviderError::ServerError(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(404, "", None),
            ProviderError::NotFound(_)
        ));
        assert!(matches!(
            ProviderError::from_http_status(400, "bad season", None),
            ProviderError::InvalidRequest(_)
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::ServerError("HTTP 503".into()).is_transient());
        assert!(ProviderError::RequestFailed("timed out".into()).is_transient());
        assert!(ProviderError::from_http_status(429, "", None).is_transient());
        assert!(!ProviderError::ParseError("bad csv".into()).is_transient());
        assert!(!ProviderError::from_http_status(400, "bad season", None).is_transient());
    }

    #[test]
    fn test_retry_after_only_from_rate_limit() {
        assert_eq!(
            ProviderError::from_http_status(429, "", Some(2)).retry_after(),
            Some(Duration::from_secs(2))
        );
        assert_eq!(ProviderError::from_http_status(429, "", None).retry_after(), None);
        assert_eq!(ProviderError::from_http_status(503, "", Some(2)).retry_after(), None);
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(500);
        let err = ProviderError::from_http_status(500, &body, None);
        assert!(err.to_string().len() < 260);
    }

    #[test]
    fn test_foundation_conversion_is_retryable_for_network() {
        let err: FoundationError = ProviderError::Network("refused".into()).into();
        assert!(err.is_retryable());

        let err: FoundationError = ProviderError::ParseError("bad csv".into()).into();
        assert!(!err.is_retryable());
    }
}
