//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::chat_completions::ChatCompletionsNamer;
use crate::adapters::recording::vision_namer::RecordingVisionNamer;
use crate::adapters::replaying::vision_namer::ReplayingVisionNamer;
use crate::cassette::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::NamingConfig;
use crate::error::NamingError;
use crate::ports::VisionNamer;

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Vision namer port.
    pub namer: Box<dyn VisionNamer>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        if recorder.is_empty() {
            tracing::warn!("no naming calls were recorded");
        }
        tracing::debug!(calls = recorder.len(), "writing cassette");
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context talking to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or API key is not configured.
    pub fn live(config: &NamingConfig) -> Result<Self, NamingError> {
        if config.api_url.is_empty() {
            return Err(NamingError::Config(
                "No AI naming endpoint. Set AI_NAMING_API_URL or naming.api_url.".into(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(NamingError::MissingApiKey { env_var: "AI_NAMING_API_KEY".into() });
        }
        let namer = ChatCompletionsNamer::new(config.api_url.clone(), config.api_key.clone());
        Ok(Self { namer: Box::new(namer) })
    }

    /// Create a recording context that wraps the live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live adapter cannot be configured.
    pub fn recording(config: &NamingConfig) -> Result<(Self, RecordingSession), NamingError> {
        let live_ctx = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".ainame/cassettes")
            .join(&timestamp)
            .join("vision_namer.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-vision_namer"),
            get_commit_hash(),
        )));

        let namer = RecordingVisionNamer::new(live_ctx.namer, Arc::clone(&recorder));
        Ok((Self { namer: Box::new(namer) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, NamingError> {
        let replayer = Arc::new(Mutex::new(load_cassette(path)?));
        Ok(Self { namer: Box::new(ReplayingVisionNamer::new(replayer)) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
