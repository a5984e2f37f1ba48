//! Accumulates interactions and writes them out as a cassette.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};

/// Collects interactions in call order and writes them as one YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path` on [`finish`](Self::finish).
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Append an interaction; its `seq` is its position in the session.
    pub fn record(
        &mut self,
        port: &str,
        method: &str,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.to_string(),
            method: method.to_string(),
            input,
            output,
        });
    }

    /// Write the cassette, creating parent directories, and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::loader::load_cassette;
    use serde_json::json;

    #[test]
    fn finish_writes_replayable_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/scene.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "scene", "deadbeef");
        recorder.record("image_generator", "generate", json!({"n": 1}), json!({"Ok": {"parts": []}}));
        recorder.record("image_generator", "generate", json!({"n": 2}), json!({"Err": "quota"}));

        let written = recorder.finish().unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("deadbeef"));

        let mut replayer = load_cassette(&path).unwrap();
        let first = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(first.input["n"], 1);
        let second = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(second.seq, 1);
        assert_eq!(second.output["Err"], "quota");
    }
}
