//! Data-URI packaging for network submission.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use base64::Engine;

use crate::error::NamingError;

/// Input is fed to the base64 encoder in slices of this size.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Build `data:<mime>;base64,<payload>` from raw bytes.
///
/// The payload is encoded incrementally, [`CHUNK_SIZE`] bytes at a time,
/// straight into the output string, so no intermediate copy of the input is
/// ever built.
///
/// # Errors
///
/// Returns `Io` if the streaming encoder fails, which only happens on
/// allocation failure.
pub fn to_data_uri(bytes: &[u8], mime_type: &str) -> Result<String, NamingError> {
    let prefix = format!("data:{mime_type};base64,");
    let capacity = prefix.len() + base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut out = String::with_capacity(capacity);
    out.push_str(&prefix);

    let mut writer = EncoderStringWriter::from_consumer(out, &STANDARD);
    for chunk in bytes.chunks(CHUNK_SIZE) {
        writer.write_all(chunk)?;
    }
    Ok(writer.into_inner())
}

/// Split a base64 data URI back into its MIME type and decoded bytes.
///
/// Returns `None` for anything that is not a well-formed base64 data URI.
#[must_use]
pub fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime.to_string(), bytes))
}
