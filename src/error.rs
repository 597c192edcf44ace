//! Unified error type for ainame.

use thiserror::Error;

/// Errors that can occur while preparing an image or asking the vision API for a name.
#[derive(Debug, Error)]
pub enum NamingError {
    /// The image bytes could not be decoded into pixels.
    #[error("Decode error ({media_type}): {message}")]
    Decode {
        /// Declared media type of the source.
        media_type: String,
        /// Decoder message.
        message: String,
    },

    /// No attempted quality step produced output within the byte ceiling.
    #[error("Encoded size {smallest} bytes exceeds budget of {max_bytes} bytes at every quality step")]
    EncodeBudgetExceeded {
        /// Byte ceiling that had to be met.
        max_bytes: usize,
        /// Size of the smallest candidate produced.
        smallest: usize,
    },

    /// JPEG encoding itself failed.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The remote call exceeded the configured timeout and was cancelled.
    #[error("Request timed out after {after_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        after_ms: u64,
    },

    /// The caller cancelled the operation.
    #[error("Request cancelled")]
    Cancelled,

    /// An API returned an error response.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// The API answered successfully but without any usable text.
    #[error("API returned empty response")]
    EmptyResponse,

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No API key configured for the naming endpoint.
    #[error("No API key for AI naming. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

impl NamingError {
    /// Short, stable label for the failure kind, used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::EncodeBudgetExceeded { .. } => "encode_budget_exceeded",
            Self::Encode(_) => "encode",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Api { .. } => "api",
            Self::EmptyResponse => "empty_response",
            Self::Network(_) => "network",
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::MissingApiKey { .. } => "missing_api_key",
        }
    }
}
