//! Builds the image generator for the selected run mode.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::gemini::GeminiGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::loader::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, API_KEY_ENV_VARS};
use crate::error::ImageError;
use crate::ports::ImageGenerator;

/// Directory recorded cassettes are written under.
const CASSETTE_ROOT: &str = ".product-scene/cassettes";

/// Holds the generator implementation for one run.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the cassette to disk.
    ///
    /// Call only after the context's generator has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is still alive or the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context talking to Gemini.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::MissingApiKey`] if no credential is configured.
    pub fn live(config: &Config) -> Result<Self, ImageError> {
        let key = config
            .api_key()
            .ok_or_else(|| ImageError::MissingApiKey { env_var: API_KEY_ENV_VARS.join(" or ") })?;
        Ok(Self { generator: Box::new(GeminiGenerator::new(key)) })
    }

    /// Create a live context whose calls are also written to a new cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), ImageError> {
        let live = Self::live(config)?;
        Ok(Self::record_into(live.generator, Path::new(CASSETTE_ROOT)))
    }

    /// Wrap `inner` so its calls land in `<root>/<timestamp>/image_generator.cassette.yaml`.
    fn record_into(inner: Box<dyn ImageGenerator>, root: &Path) -> (Self, RecordingSession) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = root.join(&timestamp).join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-product-scene"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(inner, Arc::clone(&recorder));
        (Self { generator: Box::new(generator) }, RecordingSession { recorder })
    }

    /// Create a context that serves responses from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = load_cassette(path)
            .map_err(|e| ImageError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { generator: Box::new(generator) })
    }
}

/// Current git commit hash, or "unknown" outside a repository.
fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
