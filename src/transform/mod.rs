//! Statistical feature transformers and their fit/reuse lifecycle.
//!
//! # Submodules
//! - [`tfidf`]: text vectorizer
//! - [`scaler`]: numeric standardisation
//!
//! The lifecycle is chosen once when the extractor is built:
//! [`TrainableTransformers`] fit on the current batch and persist the result,
//! [`FrozenTransformers`] are loaded up front and only ever transform.

pub mod scaler;
pub mod tfidf;

use anyhow::Result;
use ndarray::{Array2, ArrayView2};
use tracing::info;

use crate::artifacts::{ArtifactStore, PARSE_HINT, SCALER_FILE, VECTORIZER_FILE};
use scaler::StandardScaler;
use tfidf::TfidfVectorizer;

/// Scaled numeric block and vectorised text block for one batch.
pub type TransformedBlocks = (Array2<f64>, Array2<f64>);

#[derive(Debug, Clone, PartialEq)]
pub struct FittedTransformers {
    pub vectorizer: TfidfVectorizer,
    pub scaler: StandardScaler,
}

impl FittedTransformers {
    pub fn transform(
        &self,
        numeric: ArrayView2<'_, f64>,
        text: &[String],
    ) -> Result<TransformedBlocks> {
        let scaled = self.scaler.transform(numeric)?;
        let vectorised = self.vectorizer.transform(text);
        Ok((scaled, vectorised))
    }

    pub fn n_features(&self) -> usize {
        self.scaler.n_features() + self.vectorizer.n_features()
    }
}

/// Fits fresh transformers on each batch and writes them to the store.
#[derive(Debug, Clone)]
pub struct TrainableTransformers {
    store: ArtifactStore,
    max_features: usize,
}

impl TrainableTransformers {
    pub fn new(store: ArtifactStore, max_features: usize) -> Self {
        Self {
            store,
            max_features,
        }
    }

    pub fn fit_and_persist(
        &self,
        numeric: ArrayView2<'_, f64>,
        text: &[String],
    ) -> Result<FittedTransformers> {
        let vectorizer = TfidfVectorizer::fit(text, self.max_features)?;
        let scaler = StandardScaler::fit(numeric)?;
        info!(
            vocabulary = vectorizer.n_features(),
            numeric = scaler.n_features(),
            rows = text.len(),
            "fitted transformers"
        );
        // both files are written before either replaces a previous fit
        let staged_vectorizer = self.store.stage(VECTORIZER_FILE, &vectorizer)?;
        let staged_scaler = self.store.stage(SCALER_FILE, &scaler)?;
        staged_vectorizer.commit()?;
        staged_scaler.commit()?;
        Ok(FittedTransformers { vectorizer, scaler })
    }
}

/// Previously fitted transformers, used strictly for transform.
#[derive(Debug, Clone)]
pub struct FrozenTransformers {
    fitted: FittedTransformers,
}

impl FrozenTransformers {
    /// Load both artifacts; fails with `ArtifactMissing` if either is absent.
    pub fn load(store: &ArtifactStore) -> Result<Self> {
        let vectorizer: TfidfVectorizer = store.load(VECTORIZER_FILE, PARSE_HINT)?;
        let scaler: StandardScaler = store.load(SCALER_FILE, PARSE_HINT)?;
        info!(
            dir = %store.dir().display(),
            vocabulary = vectorizer.n_features(),
            "loaded frozen transformers"
        );
        Ok(Self {
            fitted: FittedTransformers { vectorizer, scaler },
        })
    }

    pub fn fitted(&self) -> &FittedTransformers {
        &self.fitted
    }
}

#[derive(Debug, Clone)]
pub enum Transformers {
    Trainable(TrainableTransformers),
    Frozen(FrozenTransformers),
}

impl Transformers {
    pub fn is_training(&self) -> bool {
        matches!(self, Transformers::Trainable(_))
    }

    pub fn apply(&self, numeric: ArrayView2<'_, f64>, text: &[String]) -> Result<TransformedBlocks> {
        match self {
            Transformers::Trainable(t) => t.fit_and_persist(numeric, text)?.transform(numeric, text),
            Transformers::Frozen(f) => f.fitted().transform(numeric, text),
        }
    }
}
