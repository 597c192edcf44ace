//! Sequential retries around [`request_name`].
//!
//! The wait before retry `n + 1` is `n` seconds. The schedule is linear,
//! not exponential.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::NamingError;
use crate::naming::request_name;
use crate::ports::{NamingRequest, VisionNamer};

/// Base unit of the linear backoff.
pub const BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// Delay after failed attempt `attempt` (1-based).
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_UNIT * attempt
}

/// Try up to `max_retries` attempts and return the first sanitized name.
///
/// Every failure kind is retried; only exhausting the attempts or a cancelled
/// `cancel` token stops early. Never fails: exhaustion yields `None`.
pub async fn request_name_with_retry(
    namer: &dyn VisionNamer,
    request: &NamingRequest,
    timeout: Duration,
    max_retries: u32,
    cancel: &CancellationToken,
) -> Option<String> {
    for attempt in 1..=max_retries {
        tracing::debug!(attempt, max_retries, "naming attempt");

        match request_name(namer, request, timeout, cancel).await {
            Ok(name) => {
                tracing::info!(attempt, name = %name, "AI name generated");
                return Some(name);
            }
            Err(NamingError::Cancelled) => {
                tracing::info!(attempt, "naming cancelled by caller");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max_retries,
                    kind = e.kind(),
                    error = %e,
                    "naming attempt failed"
                );
            }
        }

        if attempt < max_retries {
            let delay = backoff_delay(attempt);
            tracing::debug!(delay = ?delay, "retrying after backoff");
            tokio::select! {
                () = cancel.cancelled() => return None,
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    tracing::warn!(max_retries, "AI naming failed after all attempts");
    None
}
