//! Bounded retry for network operations that must fail soft.
//!
//! [`RetryPolicy::run`] invokes an operation up to `max_attempts` times.
//! Every failed attempt is logged with its index and cause; the first success
//! is returned immediately. When all attempts fail the caller receives `None`
//! rather than the underlying error, so a single unreachable page or file can
//! never abort the crawl.
//!
//! Retries are immediate: there is no backoff between attempts.
//!
//! # Example
//!
//! ```
//! use podcrawl_core::download::RetryPolicy;
//!
//! # async fn example() {
//! let policy = RetryPolicy::with_max_attempts(3);
//! let value: Option<u32> = policy
//!     .run("compute", |attempt| async move {
//!         if attempt < 2 { Err("not yet") } else { Ok(42) }
//!     })
//!     .await;
//! assert_eq!(value, Some(42));
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

/// Configuration for bounded, immediate retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    max_attempts: u32,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts (minimum 1).
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `operation` until it succeeds or the attempt ceiling is reached.
    ///
    /// The operation receives the 1-indexed attempt number. Failures are
    /// logged and swallowed; exhaustion yields `None`.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Option<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        for attempt in 1..=self.max_attempts {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(label, attempt, "succeeded after retry");
                    }
                    return Some(value);
                }
                Err(error) => {
                    warn!(
                        label,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "attempt failed"
                    );
                }
            }
        }

        warn!(label, max_attempts = self.max_attempts, "attempts exhausted");
        None
    }
}
