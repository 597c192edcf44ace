//! One timed naming attempt against a [`VisionNamer`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::NamingError;
use crate::ports::{NamingRequest, VisionNamer};
use crate::sanitize::sanitize_filename;

/// Ask `namer` for a name once, bounded by `timeout`.
///
/// A child of `parent` is handed to the adapter and is cancelled on every
/// exit path, so an abandoned request never outlives this call.
///
/// # Errors
///
/// `Timeout` when the timer fires first, `Cancelled` when `parent` fires,
/// `EmptyResponse` when the text is empty or sanitizes to nothing, and any
/// error the adapter reports (`Api`, `Network`, ...).
pub async fn request_name(
    namer: &dyn VisionNamer,
    request: &NamingRequest,
    timeout: Duration,
    parent: &CancellationToken,
) -> Result<String, NamingError> {
    let cancel = parent.child_token();
    let _guard = cancel.clone().drop_guard();

    let call = namer.suggest_name(request, cancel.clone());
    let raw = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(NamingError::Cancelled),
        () = tokio::time::sleep(timeout) => {
            cancel.cancel();
            let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            return Err(NamingError::Timeout { after_ms });
        }
        result = call => result?,
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NamingError::EmptyResponse);
    }

    let name = sanitize_filename(raw);
    if name.is_empty() {
        tracing::debug!(raw, "response sanitized to nothing");
        return Err(NamingError::EmptyResponse);
    }
    Ok(name)
}
