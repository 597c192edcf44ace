//! ainame - bounded image summaries for vision APIs, turned into filenames.
//!
//! The upload handler calls [`name_image`] with the raw bytes, their declared
//! media type and the naming settings. It gets back a sanitized slug, or
//! `None` when it should apply its configured fallback scheme.

pub mod adapters;
pub mod cassette;
pub mod config;
pub mod context;
pub mod error;
pub mod media;
pub mod naming;
pub mod pipeline;
pub mod ports;
pub mod retry;
pub mod sanitize;
pub mod thumbnail;
pub mod transport;

pub use config::{FallbackNameType, NamingConfig, Settings};
pub use error::NamingError;
pub use media::{ImageBuffer, MediaType};
pub use pipeline::name_image;
pub use ports::{NamingRequest, VisionNamer};
pub use sanitize::sanitize_filename;
pub use thumbnail::{CompressionStrategy, ThumbnailConfig};
