//! `.npy` persistence of the feature matrix and label vector.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use ndarray_npy::{read_npy, write_npy};
use tracing::{info, warn};

use crate::artifacts::PARSE_HINT;
use crate::error::PipelineError;
use crate::extractor::FeatureSet;

pub const FEATURES_FILE: &str = "x_data.npy";
pub const LABELS_FILE: &str = "y_data.npy";

/// Write `x_data.npy` and, when labels are present, `y_data.npy` into `dir`.
pub fn save_feature_set(dir: &Path, set: &FeatureSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;

    let mut written = Vec::new();
    let x_path = dir.join(FEATURES_FILE);
    write_npy(&x_path, &set.x)
        .with_context(|| format!("failed to write {}", x_path.display()))?;
    written.push(x_path);

    let y_path = dir.join(LABELS_FILE);
    match &set.y {
        Some(y) => {
            write_npy(&y_path, y)
                .with_context(|| format!("failed to write {}", y_path.display()))?;
            written.push(y_path);
        }
        None if y_path.exists() => {
            // labels from an earlier training run no longer match x_data.npy
            fs::remove_file(&y_path)
                .with_context(|| format!("failed to remove stale {}", y_path.display()))?;
            warn!(path = %y_path.display(), "removed stale labels");
        }
        None => {}
    }

    info!(dir = %dir.display(), rows = set.n_rows(), files = written.len(), "saved arrays");
    Ok(written)
}

pub fn load_features(path: &Path) -> Result<Array2<f32>> {
    if !path.exists() {
        return Err(PipelineError::InputMissing(path.to_path_buf()).into());
    }
    read_npy(path).with_context(|| format!("failed to read feature matrix {}", path.display()))
}

/// Load the training arrays written by `parse-data`, checking row alignment.
pub fn load_training_arrays(dir: &Path) -> Result<(Array2<f32>, Array1<i64>)> {
    let x_path = dir.join(FEATURES_FILE);
    let y_path = dir.join(LABELS_FILE);
    for path in [&x_path, &y_path] {
        if !path.exists() {
            return Err(PipelineError::ArtifactMissing {
                path: path.clone(),
                hint: PARSE_HINT,
            }
            .into());
        }
    }

    let x: Array2<f32> =
        read_npy(&x_path).with_context(|| format!("failed to read {}", x_path.display()))?;
    let y: Array1<i64> =
        read_npy(&y_path).with_context(|| format!("failed to read {}", y_path.display()))?;
    if x.nrows() != y.len() {
        return Err(PipelineError::ShapeMismatch {
            expected: format!("{} labels", x.nrows()),
            found: format!("{} labels", y.len()),
        }
        .into());
    }
    info!(rows = x.nrows(), features = x.ncols(), "loaded training arrays");
    Ok((x, y))
}
