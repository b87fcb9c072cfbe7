use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Per-column standardisation to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    /// Population standard deviation; constant columns use 1.
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self, PipelineError> {
        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            PipelineError::EmptyDataset("cannot fit scaler on zero rows".to_string())
        })?;
        let var = data.var_axis(Axis(0), 0.0);
        let scale = var
            .iter()
            .map(|v| {
                let std = v.sqrt();
                if std == 0.0 { 1.0 } else { std }
            })
            .collect();
        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, PipelineError> {
        if data.ncols() != self.n_features() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} numeric columns", self.n_features()),
                found: format!("{} numeric columns", data.ncols()),
            });
        }
        let mut out = data.to_owned();
        for (col, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, scale) = (self.mean[col], self.scale[col]);
            column.mapv_inplace(|v| (v - mean) / scale);
        }
        Ok(out)
    }
}
