//! A small bounded-backoff helper for the one write path where a transient
//! storage error shouldn't immediately surface mid-transition: retrying a
//! general-purpose crate here would be overkill for three bounded attempts.

use crate::error::Error;
use std::future::Future;
use tokio::time::{sleep, Duration};

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY: Duration = Duration::from_millis(50);

/// Retries `op` up to [`MAX_ATTEMPTS`] times, doubling the delay each time,
/// but only for [`Error::Transient`] — every other error (including
/// [`Error::LogUnavailable`], which must not be retried silently) is
/// returned on the first attempt.
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut delay = BASE_DELAY;
    for attempt in 1..=MAX_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err @ Error::Transient { .. }) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(attempt, %err, "retrying after transient error");
                sleep(delay).await;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }
    unreachable!("loop always returns by its final attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures_within_budget() {
        let calls = AtomicU32::new(0);
        let result = with_retry(|| async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(Error::Transient { component: "log", message: "timeout".into() })
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let result: Result<(), Error> =
            with_retry(|| async { Err(Error::Transient { component: "log", message: "timeout".into() }) }).await;
        assert!(matches!(result, Err(Error::Transient { .. })));
    }

    #[tokio::test]
    async fn never_retries_non_transient_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), Error> = with_retry(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Validation("bad order".into()))
        })
        .await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
