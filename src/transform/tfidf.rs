//! TF-IDF text vectorizer with a capped vocabulary.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::LazyLock;

use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Words of two or more word characters.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

pub fn tokenize(doc: &str) -> Vec<String> {
    let lowered = doc.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Sorted; a term's position is its output column.
    vocabulary: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and smoothed IDF weights from `docs`.
    ///
    /// When more than `max_features` terms exist, the most frequent across the
    /// corpus are kept (ties broken alphabetically).
    pub fn fit(docs: &[String], max_features: usize) -> Result<Self, PipelineError> {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in docs {
            let tokens = tokenize(doc);
            let mut seen: Vec<&String> = Vec::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                if !seen.contains(&token) {
                    seen.push(token);
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        if term_counts.is_empty() {
            return Err(PipelineError::EmptyDataset(
                "text vectorizer found no tokens; documents contain only stop characters"
                    .to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        ranked.truncate(max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort();

        let n_docs = docs.len() as f64;
        let idf = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// One L2-normalised row per document; out-of-vocabulary terms are ignored.
    pub fn transform(&self, docs: &[String]) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((docs.len(), self.n_features()));
        for (row, doc) in docs.iter().enumerate() {
            for token in tokenize(doc) {
                if let Ok(col) = self.vocabulary.binary_search(&token) {
                    out[[row, col]] += 1.0;
                }
            }

            let mut norm = 0.0f64;
            for (col, idf) in self.idf.iter().enumerate() {
                let weighted = out[[row, col]] * idf;
                out[[row, col]] = weighted;
                norm += weighted * weighted;
            }
            if norm > 0.0 {
                let norm = norm.sqrt();
                out.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(
            tokenize("Senior C++ Разработчик, Go"),
            vec!["senior", "разработчик", "go"]
        );
    }

    #[test]
    fn test_vocabulary_is_sorted_and_capped_by_frequency() {
        let corpus = docs(&["python python java", "python go", "rust"]);
        let vec = TfidfVectorizer::fit(&corpus, 2).unwrap();
        // python=3; go, java, rust tie at 1 and "go" wins alphabetically
        assert_eq!(vec.vocabulary(), &["go".to_string(), "python".to_string()]);
    }

    #[test]
    fn test_smoothed_idf_and_l2_rows() {
        let corpus = docs(&["python developer", "python"]);
        let vec = TfidfVectorizer::fit(&corpus, 10).unwrap();
        assert_eq!(vec.vocabulary(), &["developer".to_string(), "python".to_string()]);

        let x = vec.transform(&corpus);
        assert_eq!(x.shape(), &[2, 2]);
        // second doc only has "python"
        assert!((x[[1, 0]]).abs() < 1e-12);
        assert!((x[[1, 1]] - 1.0).abs() < 1e-12);
        // first row is unit length and the rarer term weighs more
        let norm: f64 = x.row(0).iter().map(|v| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(x[[0, 0]] > x[[0, 1]]);
    }

    #[test]
    fn test_unknown_terms_give_zero_row() {
        let vec = TfidfVectorizer::fit(&docs(&["python"]), 10).unwrap();
        let x = vec.transform(&docs(&["продавец"]));
        assert_eq!(x.row(0).iter().copied().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_empty_vocabulary_is_error() {
        assert!(TfidfVectorizer::fit(&docs(&["a b", ""]), 10).is_err());
    }
}
