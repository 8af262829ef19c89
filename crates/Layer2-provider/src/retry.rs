//! Retry for upstream HTTP requests
//!
//! Both clients send every round trip through [`with_retry`]. Only
//! transient failures are retried (5xx, timeouts, dropped connections,
//! 429). A 429 carrying `Retry-After` waits as long as the server asks,
//! capped at `max_delay`; everything else backs off exponentially with
//! ±20% jitter so concurrent per-day Savant searches spread out.

use crate::error::ProviderError;
use baseball_foundation::UpstreamConfig;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry; doubles each time
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    pub fn from_upstream(config: &UpstreamConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            ..Default::default()
        }
    }

    /// Un-jittered backoff before retry number `retry` (0-indexed)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay)
    }

    /// How long to wait after `err` before retry number `retry`
    fn delay_after(&self, err: &ProviderError, retry: u32) -> Duration {
        match err.retry_after() {
            Some(asked) => asked.min(self.max_delay),
            None => self
                .backoff(retry)
                .mul_f64(rand::thread_rng().gen_range(0.8..1.2)),
        }
    }
}

/// Send `request` until it succeeds, fails permanently, or retries run out.
///
/// `label` names the request (an API path or search name) in logs.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    label: &str,
    mut request: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut retry = 0;
    loop {
        let err = match request().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_transient() {
            debug!(request = label, error = %err, "upstream request failed permanently");
            return Err(err);
        }
        if retry >= config.max_retries {
            warn!(
                request = label,
                attempts = retry + 1,
                error = %err,
                "upstream request failed, giving up"
            );
            return Err(err);
        }

        let delay = config.delay_after(&err, retry);
        warn!(
            request = label,
            attempt = retry + 1,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "upstream request failed, retrying"
        );
        sleep(delay).await;
        retry += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = RetryConfig::default();

        assert_eq!(config.backoff(0), Duration::from_millis(500));
        assert_eq!(config.backoff(1), Duration::from_millis(1000));
        assert_eq!(config.backoff(2), Duration::from_millis(2000));
        assert_eq!(config.backoff(6), Duration::from_secs(8));
        assert_eq!(config.backoff(40), Duration::from_secs(8));
    }

    #[test]
    fn test_delay_is_jittered_around_backoff() {
        let config = RetryConfig::default();
        let err = ProviderError::ServerError("HTTP 502".into());
        for _ in 0..100 {
            let delay = config.delay_after(&err, 1);
            assert!(delay >= Duration::from_millis(799) && delay <= Duration::from_millis(1200));
        }
    }

    #[test]
    fn test_retry_after_is_honoured_and_capped() {
        let config = RetryConfig::default();
        let asked = ProviderError::RateLimited {
            retry_after_ms: Some(3000),
        };
        assert_eq!(config.delay_after(&asked, 0), Duration::from_secs(3));

        let too_long = ProviderError::RateLimited {
            retry_after_ms: Some(60_000),
        };
        assert_eq!(config.delay_after(&too_long, 0), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_transient_failure_then_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast(), "/api/v1/standings", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ProviderError::ServerError("HTTP 502".into()))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast(), "/api/v1/teams", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::NotFound("no such team".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast(), "statcast_search", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ProviderError::Network("refused".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
