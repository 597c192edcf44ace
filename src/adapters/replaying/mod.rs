//! Replaying adapters that serve recorded interactions from cassettes.

pub mod vision_namer;

use std::sync::{Arc, Mutex};

use crate::cassette::format::Interaction;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::NamingError;

/// Take the next recorded interaction for a given port and method.
///
/// # Errors
///
/// Returns `Config` when the cassette has nothing left to serve.
pub(crate) fn next_interaction(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<Interaction, NamingError> {
    let mut guard =
        replayer.lock().map_err(|e| NamingError::Config(format!("replayer lock poisoned: {e}")))?;
    guard.next_interaction(port, method).map_err(|e| NamingError::Config(e.to_string()))
}

/// Deserialize a replayed output as `Result<T, String>`.
///
/// Outputs follow the recording convention: `{"Ok": value}` or `{"Err": message}`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<Result<T, String>, serde_json::Error> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        let msg = err_val.as_str().unwrap_or("replayed error").to_string();
        return Ok(Err(msg));
    }
    if let Some(ok_val) = output.get("Ok").or_else(|| output.get("ok")) {
        return serde_json::from_value(ok_val.clone()).map(Ok);
    }
    serde_json::from_value(output).map(Ok)
}
