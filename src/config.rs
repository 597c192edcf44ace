//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::thumbnail::ThumbnailConfig;

/// Prompt used when none is configured.
pub const DEFAULT_PROMPT: &str = "Please give this image a concise, descriptive filename \
     (without extension, max 30 characters, use hyphens instead of spaces). \
     Only return the filename, nothing else.";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Attempt count used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Remote naming settings.
    #[serde(default)]
    pub naming: NamingSection,

    /// Summary image settings.
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
}

/// `[naming]` table as written in the file; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct NamingSection {
    /// Whether uploads should be AI-named at all.
    pub enabled: Option<bool>,
    /// Chat completions endpoint.
    pub api_url: Option<String>,
    /// Bearer token for the endpoint.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: Option<String>,
    /// Instruction sent with the image.
    pub prompt: Option<String>,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Number of attempts.
    pub max_retries: Option<u32>,
    /// Naming scheme the caller applies when no AI name is produced.
    pub fallback_name_type: Option<FallbackNameType>,
    /// Sources larger than this are never sent without successful compression.
    pub max_image_size: Option<u64>,
}

/// Caller-side naming scheme used when AI naming yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackNameType {
    /// Timestamp-based default name.
    #[default]
    Default,
    /// Configured prefix only.
    Prefix,
    /// The uploader's original filename.
    Origin,
    /// A short random link identifier.
    Short,
}

impl FallbackNameType {
    /// Configuration spelling of the scheme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Prefix => "prefix",
            Self::Origin => "origin",
            Self::Short => "short",
        }
    }
}

impl std::str::FromStr for FallbackNameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "prefix" => Ok(Self::Prefix),
            "origin" => Ok(Self::Origin),
            "short" => Ok(Self::Short),
            other => Err(format!(
                "Unsupported fallback name type '{other}'. Valid: default, prefix, origin, short"
            )),
        }
    }
}

/// Fully resolved naming settings for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct NamingConfig {
    /// Whether AI naming is switched on.
    pub enabled: bool,
    /// Chat completions endpoint.
    pub api_url: String,
    /// Bearer token; may be empty when unconfigured.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Instruction sent with the image.
    pub prompt: String,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Number of attempts.
    pub max_retries: u32,
    /// Scheme the caller applies on `None`.
    pub fallback_name_type: FallbackNameType,
    /// Size above which an uncompressed source is never sent.
    pub max_image_size: Option<u64>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        NamingSection::default().resolve(|_| None)
    }
}

/// Everything the pipeline needs.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Remote naming settings.
    pub naming: NamingConfig,
    /// Summary image settings.
    pub thumbnail: ThumbnailConfig,
}

impl NamingSection {
    /// Merge file values with overrides from `env`, then apply defaults.
    ///
    /// `AI_NAMING_*` variables win over the file, so a deployment can
    /// override the operator's file without editing it. This is the reverse
    /// of an admin-panel store that outranks the environment. Empty variables
    /// do not shadow file values. Zero or unparsable numbers fall back to the
    /// defaults.
    pub fn resolve(&self, env: impl Fn(&str) -> Option<String>) -> NamingConfig {
        let text = |var: &str, file: &Option<String>| {
            env(var).filter(|v| !v.is_empty()).or_else(|| file.clone().filter(|v| !v.is_empty()))
        };

        let enabled = env("AI_NAMING_ENABLED")
            .map(|v| v == "true" || v == "1")
            .or(self.enabled)
            .unwrap_or(false);
        let timeout_ms = env("AI_NAMING_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .or(self.timeout_ms)
            .filter(|&ms| ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let max_retries = env("AI_NAMING_MAX_RETRIES")
            .and_then(|v| v.parse().ok())
            .or(self.max_retries)
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_RETRIES);
        let fallback_name_type = env("AI_NAMING_FALLBACK")
            .and_then(|v| v.parse().ok())
            .or(self.fallback_name_type)
            .unwrap_or_default();

        NamingConfig {
            enabled,
            api_url: text("AI_NAMING_API_URL", &self.api_url).unwrap_or_default(),
            api_key: text("AI_NAMING_API_KEY", &self.api_key).unwrap_or_default(),
            model: text("AI_NAMING_MODEL", &self.model).unwrap_or_else(|| DEFAULT_MODEL.into()),
            prompt: text("AI_NAMING_PROMPT", &self.prompt)
                .unwrap_or_else(|| DEFAULT_PROMPT.into()),
            timeout: Duration::from_millis(timeout_ms),
            max_retries,
            fallback_name_type,
            max_image_size: self.max_image_size,
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Resolve pipeline settings, letting process environment variables win.
    #[must_use]
    pub fn settings(&self) -> Settings {
        Settings {
            naming: self.naming.resolve(|var| std::env::var(var).ok()),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `AINAME_CONFIG` environment variable
/// 3. `~/.config/ainame/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("AINAME_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/ainame/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/ainame/config.toml")
    } else {
        PathBuf::from("ainame.toml")
    }
}
