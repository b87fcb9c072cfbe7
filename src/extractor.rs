//! Feature extraction: raw table → numeric matrix (+ labels in training mode).
//!
//! Column layout of the output matrix is fixed:
//! `[is_male, salary, age, experience_months, tfidf(position + city)...]`,
//! with the three numeric columns standardised.

use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis, concatenate};
use tracing::{debug, info};

use crate::artifacts::ArtifactStore;
use crate::columns::ColumnMap;
use crate::config::{ColumnNeedles, PipelineConfig};
use crate::error::PipelineError;
use crate::filter::ItFilter;
use crate::level::LevelClassifier;
use crate::loader::RawTable;
use crate::parsers::{FieldParsers, city};
use crate::transform::{FrozenTransformers, TrainableTransformers, Transformers};

/// Number of standardised numeric columns (salary, age, experience).
pub const NUMERIC_FEATURES: usize = 3;

/// Parsed signals for one input row; numeric fields may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub salary: Option<f64>,
    pub age: Option<f64>,
    pub experience_months: Option<f64>,
    pub is_male: u8,
    pub city: String,
    /// Lowercased desired position and last position, space-joined.
    pub position_text: String,
}

impl FeatureRow {
    /// Only rows with salary, age and experience take part in training or inference.
    pub fn is_complete(&self) -> bool {
        self.salary.is_some() && self.age.is_some() && self.experience_months.is_some()
    }

    fn numeric(&self) -> [f64; NUMERIC_FEATURES] {
        [
            self.salary.unwrap_or(f64::NAN),
            self.age.unwrap_or(f64::NAN),
            self.experience_months.unwrap_or(f64::NAN),
        ]
    }

    fn document(&self) -> String {
        format!("{} {}", self.position_text, self.city)
    }
}

/// Feature matrix and, in training mode, the aligned label codes.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub x: Array2<f32>,
    pub y: Option<Array1<i64>>,
}

impl FeatureSet {
    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }
}

pub struct FeatureExtractor {
    needles: ColumnNeedles,
    parsers: FieldParsers,
    filter: ItFilter,
    classifier: LevelClassifier,
    transformers: Transformers,
}

impl FeatureExtractor {
    pub fn new(config: &PipelineConfig, transformers: Transformers) -> Self {
        Self {
            needles: config.columns.clone(),
            parsers: FieldParsers::new(config),
            filter: ItFilter::new(config),
            classifier: LevelClassifier::new(config),
            transformers,
        }
    }

    /// Fit transformers on every batch and persist them to `store`.
    pub fn for_training(config: &PipelineConfig, store: ArtifactStore) -> Self {
        let transformers =
            Transformers::Trainable(TrainableTransformers::new(store, config.max_features));
        Self::new(config, transformers)
    }

    /// Reuse transformers persisted by a training run; fails if none exist.
    pub fn for_inference(config: &PipelineConfig, store: &ArtifactStore) -> Result<Self> {
        let frozen = FrozenTransformers::load(store)?;
        Ok(Self::new(config, Transformers::Frozen(frozen)))
    }

    pub fn is_training(&self) -> bool {
        self.transformers.is_training()
    }

    /// Parse every input row; no filtering.
    pub fn derive_rows(&self, table: &RawTable, columns: &ColumnMap) -> Vec<FeatureRow> {
        (0..table.len())
            .map(|row| {
                let gender_age = table.cell(row, columns.gender_age);
                let position_text = format!(
                    "{} {}",
                    table.cell(row, columns.desired_position).unwrap_or_default(),
                    table.cell(row, columns.last_position).unwrap_or_default()
                )
                .to_lowercase();
                FeatureRow {
                    salary: self.parsers.salary(table.cell(row, columns.salary)),
                    age: self.parsers.age(gender_age),
                    experience_months: self
                        .parsers
                        .experience_months(table.cell(row, columns.experience)),
                    is_male: self.parsers.is_male(gender_age),
                    city: city(table.cell(row, columns.city)),
                    position_text,
                }
            })
            .collect()
    }

    /// Rows that are IT-related and have every mandatory numeric field.
    pub fn select_rows(&self, rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
        let total = rows.len();
        let it_rows: Vec<FeatureRow> = rows
            .into_iter()
            .filter(|r| self.filter.is_it(Some(&r.position_text)))
            .collect();
        let it_count = it_rows.len();
        let complete: Vec<FeatureRow> = it_rows.into_iter().filter(FeatureRow::is_complete).collect();
        info!(
            total,
            it_rows = it_count,
            complete = complete.len(),
            "filtered rows"
        );
        complete
    }

    pub fn extract(&self, table: &RawTable) -> Result<FeatureSet> {
        let columns = ColumnMap::resolve(&table.headers, &self.needles)?;
        debug!(?columns, "resolved columns");

        let rows = self.select_rows(self.derive_rows(table, &columns));
        if rows.is_empty() && self.is_training() {
            return Err(PipelineError::EmptyDataset(
                "no IT rows with salary, age and experience to train on".to_string(),
            )
            .into());
        }

        let y = self.is_training().then(|| {
            rows.iter()
                .map(|r| self.classifier.classify(r.experience_months, &r.position_text).code())
                .collect::<Array1<i64>>()
        });

        let numeric = Array2::from_shape_vec(
            (rows.len(), NUMERIC_FEATURES),
            rows.iter().flat_map(FeatureRow::numeric).collect(),
        )
        .context("failed to assemble numeric block")?;
        let documents: Vec<String> = rows.iter().map(FeatureRow::document).collect();
        let gender = Array2::from_shape_vec(
            (rows.len(), 1),
            rows.iter().map(|r| f64::from(r.is_male)).collect(),
        )
        .context("failed to assemble gender column")?;

        let (scaled, vectorised) = self.transformers.apply(numeric.view(), &documents)?;
        let x = concatenate(Axis(1), &[gender.view(), scaled.view(), vectorised.view()])
            .context("failed to concatenate feature blocks")?
            .mapv(|v| v as f32);

        info!(rows = x.nrows(), columns = x.ncols(), labelled = y.is_some(), "extracted features");
        Ok(FeatureSet { x, y })
    }
}
