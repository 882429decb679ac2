//! Retrying wrapper around the raw pin capability.

use std::time::Duration;

use homectl_domain::error::ActuationError;
use homectl_domain::pin::PinLevel;

use crate::ports::PinDriver;
use crate::retry::with_retries;

/// Default number of attempts per pin operation.
const DEFAULT_ATTEMPTS: u32 = 3;
/// Default pause between attempts.
const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Calls the underlying capability up to a fixed number of times with a
/// short delay between attempts. The first success short-circuits;
/// exhausting the retries yields an [`ActuationError`] without panicking.
pub struct RetryingDriver<D> {
    driver: D,
    attempts: u32,
    delay: Duration,
}

impl<D: PinDriver + Send + Sync> RetryingDriver<D> {
    /// Wrap a driver with the default retry policy (3 attempts, 500 ms).
    pub fn new(driver: D) -> Self {
        Self::with_policy(driver, DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }

    /// Wrap a driver with an explicit retry policy.
    pub fn with_policy(driver: D, attempts: u32, delay: Duration) -> Self {
        Self {
            driver,
            attempts: attempts.max(1),
            delay,
        }
    }
}

impl<D: PinDriver + Send + Sync> PinDriver for RetryingDriver<D> {
    async fn set_pin(&self, pin: u8, level: PinLevel) -> Result<(), ActuationError> {
        with_retries(self.attempts, self.delay, || self.driver.set_pin(pin, level))
            .await
            .map_err(|_| ActuationError {
                pin,
                attempts: self.attempts,
            })
    }

    async fn read_pin(&self, pin: u8) -> Result<PinLevel, ActuationError> {
        with_retries(self.attempts, self.delay, || self.driver.read_pin(pin))
            .await
            .map_err(|_| ActuationError {
                pin,
                attempts: self.attempts,
            })
    }
}
