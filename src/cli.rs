//! CLI argument parsing with clap.

use std::path::Path;

use clap::Parser;

use ainame::media::MediaType;
use ainame::thumbnail::CompressionStrategy;

/// Name an image file with a vision model, the way an upload handler would.
#[derive(Parser, Debug)]
#[command(name = "ainame", version, about)]
pub struct Cli {
    /// Path to the image file.
    pub image: String,

    /// Declared media type (guessed from the file extension if omitted).
    #[arg(short = 't', long)]
    pub mime_type: Option<String>,

    /// Summary strategy: thumbnail, quality-search, passthrough.
    #[arg(short, long)]
    pub strategy: Option<CompressionStrategy>,

    /// Longest edge of the summary image in pixels.
    #[arg(short = 'd', long)]
    pub max_dimension: Option<u32>,

    /// Byte ceiling for quality search.
    #[arg(short = 'b', long)]
    pub max_bytes: Option<usize>,

    /// Model identifier override.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Name the image even when AI naming is disabled in config.
    #[arg(short, long)]
    pub force: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Media type from `--mime-type`, else from the file extension.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        match self.mime_type {
            Some(ref mime) => MediaType::from_mime(mime),
            None => MediaType::from_extension(
                Path::new(&self.image).extension().and_then(|e| e.to_str()).unwrap_or_default(),
            ),
        }
    }
}
