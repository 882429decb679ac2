//! Generic bounded-retry helper.
//!
//! Shared by the actuation wrapper and the persistence adapters: the same
//! attempt-count/delay loop drives pin writes and file IO.

use std::future::Future;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `delay` between attempts.
///
/// The first success short-circuits. After the last attempt the final
/// error is returned; the helper never panics. An `attempts` of zero is
/// treated as one.
///
/// # Errors
///
/// Returns the error from the last failed attempt.
pub async fn with_retries<T, E, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(_) if attempt < attempts => {
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn should_return_first_success_without_retrying() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, ()> = with_retries(3, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_succeed_on_a_later_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retries(3, Duration::ZERO, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if attempt < 3 { Err("not yet") } else { Ok(attempt) }
            }
        })
        .await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn should_return_last_error_after_exhausting_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), u32> = with_retries(3, Duration::ZERO, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(attempt) }
        })
        .await;
        assert_eq!(result, Err(3));
    }

    #[tokio::test]
    async fn should_treat_zero_attempts_as_one() {
        let calls = AtomicU32::new(0);
        let result: Result<(), &str> = with_retries(0, Duration::ZERO, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("nope") }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
