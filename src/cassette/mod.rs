//! Record/replay infrastructure for deterministic naming runs.
//!
//! A cassette stores every [`VisionNamer`](crate::ports::VisionNamer) call
//! with its result and latency, so timeouts and retries replay faithfully
//! without network access.

pub mod format;
pub mod recorder;
pub mod replayer;

use std::path::Path;

use self::format::Cassette;
use self::replayer::CassetteReplayer;
use crate::error::NamingError;

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns `Config` if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, NamingError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        NamingError::Config(format!("Failed to read cassette file {}: {e}", path.display()))
    })?;
    let cassette: Cassette = serde_yaml::from_str(&content).map_err(|e| {
        NamingError::Config(format!("Failed to parse cassette file {}: {e}", path.display()))
    })?;
    Ok(CassetteReplayer::new(&cassette))
}
