//! Backoff policy and per-attempt outcomes for resilient API calls.
//!
//! A fetch is a sequence of attempts. Each attempt ends in one of three ways,
//! captured by [`Attempt`]: a record was found, the API said the identifier does
//! not exist, or the service was temporarily unavailable (HTTP 503). Failures
//! while requesting or parsing are the `Err` side of an attempt.
//!
//! The two retried classes wait differently:
//! - 503 answers wait `unavailable_base * 2^attempt + unavailable_offset`
//! - every other failure waits a fixed `error_delay`

use std::time::Duration;

use super::*;

/// Outcome of a single request to the API.
#[derive(Debug)]
pub enum Attempt {
  /// The entry was found and parsed
  Found(Metadata),
  /// The API reported in-band that the identifier is unknown
  NotFound,
  /// The service answered 503 and should be asked again later
  Unavailable,
}

/// Delays inserted between attempts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use bibfetch::retry::Backoff;
///
/// let backoff = Backoff::default();
/// assert_eq!(backoff.unavailable_delay(0), Duration::from_secs(4));
/// assert_eq!(backoff.unavailable_delay(3), Duration::from_secs(11));
/// assert_eq!(backoff.error_delay, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
  /// Multiplied by `2^attempt` for a 503 answer
  pub unavailable_base:   Duration,
  /// Added to every 503 delay
  pub unavailable_offset: Duration,
  /// Delay after any other failed attempt
  pub error_delay:        Duration,
}

impl Default for Backoff {
  fn default() -> Self {
    Self {
      unavailable_base:   Duration::from_secs(1),
      unavailable_offset: Duration::from_secs(3),
      error_delay:        Duration::from_secs(1),
    }
  }
}

impl Backoff {
  /// Delay before retrying after a 503 on the zero-indexed `attempt`.
  pub fn unavailable_delay(&self, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    self.unavailable_base.saturating_mul(factor).saturating_add(self.unavailable_offset)
  }
}
