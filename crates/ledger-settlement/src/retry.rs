use ledger_core::{LedgerError, Result, RuntimeConfig};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounded retry policy for settlement write conflicts.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetrySettings {
    pub fn from_runtime(config: &RuntimeConfig) -> Self {
        Self {
            attempts: config.retry_attempts.max(1),
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(50),
        }
    }
}

/// Re-run an operation that lost a serialization race, a bounded number of
/// times. Any other outcome is returned as-is.
pub(crate) async fn with_conflict_retry<T, F, Fut>(retry: &RetrySettings, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(LedgerError::Conflict) if attempt < retry.attempts => {
                warn!(attempt, "Settlement write conflict, retrying");
                attempt += 1;
                tokio::time::sleep(retry.delay).await;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn quick() -> RetrySettings {
        RetrySettings {
            attempts: 3,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn conflict_is_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_conflict_retry(&quick(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(LedgerError::Conflict)
            } else {
                Ok(7u32)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_conflict_retry(&quick(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::Conflict)
        })
        .await;
        assert!(matches!(result, Err(LedgerError::Conflict)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn business_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_conflict_retry(&quick(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(LedgerError::InsufficientFunds)
        })
        .await;
        assert!(matches!(result, Err(LedgerError::InsufficientFunds)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
