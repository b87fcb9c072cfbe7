//! Directory-scoped storage for fitted transformers and trained classifiers.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::PipelineError;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const SCALER_FILE: &str = "scaler.json";

/// Command that produces the transformer artifacts.
pub const PARSE_HINT: &str = "parse-data";
/// Command that produces the classifier artifacts.
pub const TRAIN_HINT: &str = "train-classifier";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Serialise `value` as JSON to `file_name`, creating the directory.
    pub fn save<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        self.stage(file_name, value)?.commit()
    }

    /// Write `value` to a temporary file next to `file_name` without replacing it.
    ///
    /// Nothing under the real name changes until [`StagedArtifact::commit`];
    /// dropping the staged artifact deletes the temporary file.
    pub fn stage<T: Serialize>(&self, file_name: &str, value: &T) -> Result<StagedArtifact> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create artifact dir {}", self.dir.display()))?;
        let mut file = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("failed to create temp file in {}", self.dir.display()))?;
        serde_json::to_writer(&mut file, value)
            .with_context(|| format!("failed to serialise artifact {file_name}"))?;
        file.flush()
            .with_context(|| format!("failed to write artifact {file_name}"))?;
        Ok(StagedArtifact {
            file,
            path: self.path(file_name),
        })
    }

    /// Load a JSON artifact; a missing file reports `hint` as the step to run.
    pub fn load<T: DeserializeOwned>(&self, file_name: &str, hint: &'static str) -> Result<T> {
        let path = self.path(file_name);
        if !path.exists() {
            return Err(PipelineError::ArtifactMissing { path, hint }.into());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("artifact {} is corrupt or incompatible", path.display()))?;
        debug!(path = %path.display(), "loaded artifact");
        Ok(value)
    }
}

/// A fully written artifact waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedArtifact {
    file: NamedTempFile,
    path: PathBuf,
}

impl StagedArtifact {
    pub fn commit(self) -> Result<PathBuf> {
        let Self { file, path } = self;
        file.persist(&path)
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        info!(path = %path.display(), "saved artifact");
        Ok(path)
    }
}
