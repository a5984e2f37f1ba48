//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variables consulted for the Gemini credential, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Fallbacks for flags not given on the command line.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default parameter values from the config file.
#[derive(Debug, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: Option<String>,
    /// Default output format (`jpeg`, `png`, `webp`).
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring the environment over the file.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|var| std::env::var(var).ok())
    }

    /// Resolve the API key against `env` in place of the process environment.
    fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        API_KEY_ENV_VARS
            .iter()
            .find_map(|var| env(var).filter(present))
            .or_else(|| self.keys.gemini.clone().filter(present))
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PRODUCT_SCENE_CONFIG` environment variable
/// 3. `~/.config/product-scene/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PRODUCT_SCENE_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/product-scene/config.toml")
    } else {
        PathBuf::from("product-scene.toml")
    }
}
