//! Lookup tables and tunables shared by every pipeline stage.
//!
//! A [`PipelineConfig`] is built once (defaults, optionally overridden from a
//! JSON file) and handed to the parsers, the IT filter, the level classifier
//! and the feature extractor.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Header substrings used to locate each logical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNeedles {
    pub gender_age: String,
    pub salary: String,
    pub experience: String,
    pub city: String,
    pub desired_position: String,
    pub last_position: String,
}

impl Default for ColumnNeedles {
    fn default() -> Self {
        Self {
            gender_age: "Пол, возраст".to_string(),
            salary: "ЗП".to_string(),
            experience: "Опыт".to_string(),
            city: "Город".to_string(),
            desired_position: "Ищет работу".to_string(),
            last_position: "должность".to_string(),
        }
    }
}

/// One entry of the currency table: a marker searched case-insensitively and
/// the multiplier converting to rubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub marker: String,
    pub rate: f64,
}

impl CurrencyRate {
    pub fn new(marker: &str, rate: f64) -> Self {
        Self {
            marker: marker.to_string(),
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnNeedles,
    /// Substrings marking a position as IT-related (matched on lowercased text).
    pub it_keywords: Vec<String>,
    pub senior_keywords: Vec<String>,
    pub junior_keywords: Vec<String>,
    /// Checked in order; the first marker found wins.
    pub currency_rates: Vec<CurrencyRate>,
    /// Token in the gender/age column that marks a male applicant.
    pub male_token: String,
    /// Vocabulary cap for the text vectorizer.
    pub max_features: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNeedles::default(),
            it_keywords: strings(&[
                "разработчик",
                "developer",
                "программист",
                "engineer",
                "инженер",
                "backend",
                "frontend",
                "fullstack",
                "qa",
                "тестировщик",
                "devops",
                "python",
                "java",
                "c++",
                "javascript",
                "php",
                "go",
                "data scientist",
            ]),
            senior_keywords: strings(&[
                "senior",
                "ведущий",
                "lead",
                "главный",
                "architect",
                "архитектор",
            ]),
            junior_keywords: strings(&["junior", "младший", "стажер", "intern", "trainee"]),
            currency_rates: vec![
                CurrencyRate::new("USD", 90.0),
                CurrencyRate::new("EUR", 98.0),
                CurrencyRate::new("KZT", 0.20),
                CurrencyRate::new("ГРН", 2.5),
                CurrencyRate::new("UAH", 2.5),
            ],
            male_token: "Мужчина".to_string(),
            max_features: 500,
        }
    }
}

impl PipelineConfig {
    /// Load defaults, overriding any fields present in the JSON file at `path`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!(path = %path.display(), "loaded pipeline config overrides");
        Ok(config)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
