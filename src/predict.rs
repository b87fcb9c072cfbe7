use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::artifacts::{ArtifactStore, TRAIN_HINT};
use crate::level::Level;
use crate::output::load_features;
use crate::trainer::{ClassifierArtifact, ModelKind};

/// Predict levels for every row of the feature matrix at `features_path`.
pub fn predict_levels(
    features_path: &Path,
    store: &ArtifactStore,
    kind: ModelKind,
) -> Result<Vec<Level>> {
    let artifact: ClassifierArtifact = store.load(kind.file_name(), TRAIN_HINT)?;
    let x = load_features(features_path)?.mapv(f64::from);
    let predicted = artifact
        .predict(&x)
        .with_context(|| format!("inference failed for {}", features_path.display()))?;

    let levels = predicted
        .iter()
        .map(|code| {
            Level::from_code(*code as i64).ok_or_else(|| anyhow!("model produced unknown class {code}"))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(model = kind.label(), samples = levels.len(), "predicted levels");
    Ok(levels)
}
