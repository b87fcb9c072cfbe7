//! Classifier training over the persisted feature/label arrays.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::error::PipelineError;
use crate::level::Level;
use crate::output::load_training_arrays;
use crate::utils;

pub const CLASS_BALANCE_FILE: &str = "class_balance.csv";
pub const TEST_FRACTION: f64 = 0.2;
pub const SPLIT_SEED: u64 = 42;
const LOGISTIC_MAX_ITERATIONS: u64 = 1000;
const TREE_MAX_DEPTH: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Multinomial logistic regression
    #[value(name = "lr")]
    Logistic,
    /// Decision tree with class-balanced sample weights
    Tree,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Logistic, ModelKind::Tree];

    pub fn file_name(self) -> &'static str {
        match self {
            ModelKind::Logistic => "classifier_lr.json",
            ModelKind::Tree => "classifier_tree.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelKind::Logistic => "LR",
            ModelKind::Tree => "Tree",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FittedModel {
    Logistic(MultiFittedLogisticRegression<f64, usize>),
    Tree(DecisionTree<f64, usize>),
}

/// A trained model plus the feature width it expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    pub kind: ModelKind,
    pub n_features: usize,
    pub model: FittedModel,
}

impl ClassifierArtifact {
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        if x.ncols() != self.n_features {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} feature columns", self.n_features),
                found: format!("{} feature columns", x.ncols()),
            }
            .into());
        }
        let predictions = match &self.model {
            FittedModel::Logistic(m) => m.predict(x),
            FittedModel::Tree(m) => m.predict(x),
        };
        Ok(predictions)
    }
}

#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Array1<usize>,
    pub x_test: Array2<f64>,
    pub y_test: Array1<usize>,
}

/// Per-class shuffled split keeping class proportions in both halves.
///
/// Each class with at least two samples contributes at least one test and one
/// training row; single-sample classes stay in training.
pub fn stratified_split(
    x: &Array2<f64>,
    y: &Array1<usize>,
    test_fraction: f64,
    seed: u64,
) -> Result<Split> {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, label) in y.iter().enumerate() {
        by_class.entry(*label).or_default().push(idx);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut test_idx = Vec::new();
    for (label, mut indices) in by_class {
        indices.shuffle(&mut rng);
        let n = indices.len();
        if n < 2 {
            warn!(label, "class has a single sample; keeping it in training split");
            train_idx.extend(indices);
            continue;
        }
        let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
        test_idx.extend_from_slice(&indices[..n_test]);
        train_idx.extend_from_slice(&indices[n_test..]);
    }

    if test_idx.is_empty() {
        return Err(PipelineError::EmptyDataset(
            "too few samples per class to hold out a test split".to_string(),
        )
        .into());
    }
    train_idx.sort_unstable();
    test_idx.sort_unstable();

    Ok(Split {
        x_train: x.select(Axis(0), &train_idx),
        y_train: y.select(Axis(0), &train_idx),
        x_test: x.select(Axis(0), &test_idx),
        y_test: y.select(Axis(0), &test_idx),
    })
}

/// Weights `n / (k * n_class)` so that every class contributes equally.
pub fn balanced_weights(y: &Array1<usize>) -> Array1<f32> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for label in y {
        *counts.entry(*label).or_insert(0) += 1;
    }
    let n = y.len() as f32;
    let k = counts.len() as f32;
    y.mapv(|label| n / (k * counts[&label] as f32))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub level: Level,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
}

impl ClassificationReport {
    pub fn new(truth: &Array1<usize>, predicted: &Array1<usize>) -> Self {
        let classes = Level::ALL
            .iter()
            .map(|level| {
                let code = level.code() as usize;
                let mut tp = 0usize;
                let mut fp = 0usize;
                let mut fn_ = 0usize;
                for (t, p) in truth.iter().zip(predicted.iter()) {
                    match (*t == code, *p == code) {
                        (true, true) => tp += 1,
                        (false, true) => fp += 1,
                        (true, false) => fn_ += 1,
                        (false, false) => {}
                    }
                }
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, tp + fn_);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    level: *level,
                    precision,
                    recall,
                    f1,
                    support: tp + fn_,
                }
            })
            .collect();

        let correct = truth
            .iter()
            .zip(predicted.iter())
            .filter(|(t, p)| t == p)
            .count();
        Self {
            classes,
            accuracy: ratio(correct, truth.len()),
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Count of each level in the label vector, in level order.
pub fn class_balance(y: &Array1<i64>) -> Vec<(Level, usize)> {
    Level::ALL
        .iter()
        .map(|level| (*level, y.iter().filter(|c| **c == level.code()).count()))
        .collect()
}

pub fn write_class_balance(docs_dir: &Path, balance: &[(Level, usize)]) -> Result<PathBuf> {
    fs::create_dir_all(docs_dir)
        .with_context(|| format!("failed to create docs dir {}", docs_dir.display()))?;
    let path = docs_dir.join(CLASS_BALANCE_FILE);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    writer.write_record(["level", "count"])?;
    for (level, count) in balance {
        writer.write_record([level.name(), count.to_string().as_str()])?;
    }
    writer.flush()?;
    info!(path = %path.display(), "wrote class balance report");
    Ok(path)
}

fn to_class_labels(y: &Array1<i64>) -> Result<Array1<usize>> {
    y.iter()
        .map(|code| {
            Level::from_code(*code)
                .map(|l| l.code() as usize)
                .ok_or_else(|| anyhow!("unknown level code {code} in label array"))
        })
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

pub fn fit_model(kind: ModelKind, split: &Split) -> Result<FittedModel> {
    let model = match kind {
        ModelKind::Logistic => {
            let dataset = Dataset::new(split.x_train.clone(), split.y_train.clone());
            let fitted: MultiFittedLogisticRegression<f64, usize> = MultiLogisticRegression::default()
                .max_iterations(LOGISTIC_MAX_ITERATIONS)
                .fit(&dataset)
                .map_err(|e| anyhow!("logistic regression training failed: {e}"))?;
            FittedModel::Logistic(fitted)
        }
        ModelKind::Tree => {
            let dataset = Dataset::new(split.x_train.clone(), split.y_train.clone())
                .with_weights(balanced_weights(&split.y_train));
            let fitted: DecisionTree<f64, usize> = DecisionTree::params()
                .max_depth(Some(TREE_MAX_DEPTH))
                .fit(&dataset)
                .map_err(|e| anyhow!("decision tree training failed: {e}"))?;
            FittedModel::Tree(fitted)
        }
    };
    Ok(model)
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub kind: ModelKind,
    pub report: ClassificationReport,
    pub model_path: PathBuf,
}

/// Train every model kind on the arrays in `data_dir`, report on the held-out
/// split, and save each model into `store`.
pub fn train_classifiers(
    data_dir: &Path,
    store: &ArtifactStore,
    docs_dir: &Path,
) -> Result<Vec<TrainingOutcome>> {
    let (x, y) = load_training_arrays(data_dir)?;
    if x.nrows() == 0 {
        return Err(PipelineError::EmptyDataset("label array is empty".to_string()).into());
    }

    let balance = class_balance(&y);
    utils::print_class_balance(&balance);
    write_class_balance(docs_dir, &balance)?;

    let x = x.mapv(f64::from);
    let labels = to_class_labels(&y)?;
    let split = stratified_split(&x, &labels, TEST_FRACTION, SPLIT_SEED)?;
    info!(
        train = split.y_train.len(),
        test = split.y_test.len(),
        "split dataset"
    );

    let mut outcomes = Vec::new();
    for kind in ModelKind::ALL {
        let model = fit_model(kind, &split)?;
        let artifact = ClassifierArtifact {
            kind,
            n_features: x.ncols(),
            model,
        };
        let predicted = artifact.predict(&split.x_test)?;
        let report = ClassificationReport::new(&split.y_test, &predicted);
        utils::print_report(kind.label(), &report);
        info!(model = kind.label(), accuracy = report.accuracy, "evaluated model");

        let model_path = store.save(kind.file_name(), &artifact)?;
        outcomes.push(TrainingOutcome {
            kind,
            report,
            model_path,
        });
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn test_stratified_split_keeps_every_class_in_test() {
        let x = Array2::from_shape_fn((15, 2), |(r, c)| (r * 2 + c) as f64);
        let y = Array1::from(vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2]);
        let split = stratified_split(&x, &y, 0.2, 42).unwrap();

        assert_eq!(split.y_test.len(), 3);
        assert_eq!(split.y_train.len(), 12);
        let mut test_classes = split.y_test.to_vec();
        test_classes.sort_unstable();
        assert_eq!(test_classes, vec![0, 1, 2]);
        assert_eq!(split.x_train.nrows(), split.y_train.len());
    }

    #[test]
    fn test_stratified_split_is_deterministic() {
        let x = Array2::from_shape_fn((10, 1), |(r, _)| r as f64);
        let y = Array1::from(vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);
        let a = stratified_split(&x, &y, 0.2, 42).unwrap();
        let b = stratified_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(a.x_test, b.x_test);
    }

    #[test]
    fn test_singleton_classes_cannot_be_split() {
        let x = array![[0.0], [1.0]];
        let y = array![0usize, 1];
        assert!(stratified_split(&x, &y, 0.2, 42).is_err());
    }

    #[test]
    fn test_balanced_weights() {
        let w = balanced_weights(&array![0usize, 0, 0, 1]);
        assert_eq!(w.to_vec(), vec![4.0 / 6.0, 4.0 / 6.0, 4.0 / 6.0, 2.0]);
    }

    #[test]
    fn test_classification_report() {
        let truth = array![0usize, 0, 1, 2];
        let predicted = array![0usize, 1, 1, 2];
        let report = ClassificationReport::new(&truth, &predicted);
        assert_eq!(report.accuracy, 0.75);

        let junior = &report.classes[0];
        assert_eq!(junior.level, Level::Junior);
        assert_eq!(junior.precision, 1.0);
        assert_eq!(junior.recall, 0.5);
        assert_eq!(junior.support, 2);

        let middle = &report.classes[1];
        assert_eq!(middle.precision, 0.5);
        assert_eq!(middle.recall, 1.0);
    }

    #[test]
    fn test_class_balance_counts_all_levels() {
        let balance = class_balance(&array![0i64, 2, 2]);
        assert_eq!(
            balance,
            vec![(Level::Junior, 1), (Level::Middle, 0), (Level::Senior, 2)]
        );
    }

    #[test]
    fn test_fitted_tree_round_trips_through_json() {
        let x = Array2::from_shape_fn((12, 2), |(r, c)| if c == 0 { (r % 3) as f64 } else { r as f64 });
        let y = Array1::from_shape_fn(12, |r| r % 3);
        let split = stratified_split(&x, &y, 0.25, 42).unwrap();
        let artifact = ClassifierArtifact {
            kind: ModelKind::Tree,
            n_features: 2,
            model: fit_model(ModelKind::Tree, &split).unwrap(),
        };

        let json = serde_json::to_string(&artifact).unwrap();
        let back: ClassifierArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(
            artifact.predict(&split.x_test).unwrap(),
            back.predict(&split.x_test).unwrap()
        );
        assert!(back.predict(&array![[1.0]]).is_err());
    }
}
