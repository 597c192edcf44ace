//! Vision namer port for chat-style vision APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::NamingError;

/// Cap on generated output; a filename needs only a handful of tokens.
pub const MAX_RESPONSE_TOKENS: u32 = 50;

/// A request for a filename suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingRequest {
    /// Remote model identifier (e.g., `"gpt-4o"`).
    pub model: String,
    /// Instruction text sent alongside the image.
    pub prompt: String,
    /// The image as a `data:` URI. Not persisted in cassettes.
    #[serde(skip)]
    pub data_uri: String,
    /// Upper bound on response tokens.
    pub max_tokens: u32,
}

impl NamingRequest {
    /// Create a request with the default response cap.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, data_uri: String) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            data_uri,
            max_tokens: MAX_RESPONSE_TOKENS,
        }
    }
}

/// Boxed future type returned by [`VisionNamer::suggest_name`].
pub type SuggestFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, NamingError>> + Send + 'a>>;

/// Asks a remote vision model to describe an image as a filename.
///
/// Implementations return the model's raw text; sanitizing is the caller's job.
/// When `cancel` fires, the in-flight call must be abandoned and resolve to
/// [`NamingError::Cancelled`].
pub trait VisionNamer: Send + Sync {
    /// Request a raw name suggestion for the image in `request`.
    fn suggest_name(
        &self,
        request: &NamingRequest,
        cancel: CancellationToken,
    ) -> SuggestFuture<'_>;
}
