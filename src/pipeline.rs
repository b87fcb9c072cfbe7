//! Loader → extractor → persister, as run by `parse-data`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::artifacts::ArtifactStore;
use crate::config::PipelineConfig;
use crate::extractor::{FeatureExtractor, FeatureSet};
use crate::loader::load_table;
use crate::output::save_feature_set;

/// Directories every command reads from or writes to.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// `x_data.npy` / `y_data.npy`
    pub data_dir: PathBuf,
    /// Fitted transformers and classifiers
    pub resources_dir: PathBuf,
    /// Reports
    pub docs_dir: PathBuf,
}

impl Workspace {
    pub fn under(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            resources_dir: root.join("resources"),
            docs_dir: root.join("docs"),
        }
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.resources_dir)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fit transformers, label rows, write features and labels.
    Training,
    /// Reuse persisted transformers and write features only.
    Inference,
}

pub struct ParseOutcome {
    pub features: FeatureSet,
    pub written: Vec<PathBuf>,
}

pub fn parse_data(
    csv_path: &Path,
    config: &PipelineConfig,
    workspace: &Workspace,
    mode: Mode,
) -> Result<ParseOutcome> {
    info!(path = %csv_path.display(), ?mode, "starting parse-data");
    let extractor = match mode {
        Mode::Training => FeatureExtractor::for_training(config, workspace.store()),
        Mode::Inference => FeatureExtractor::for_inference(config, &workspace.store())?,
    };

    let table = load_table(csv_path)?;
    let features = extractor.extract(&table)?;
    let written = save_feature_set(&workspace.data_dir, &features)?;
    Ok(ParseOutcome { features, written })
}
