//! Three-class seniority labelling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    Middle,
    Senior,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Junior, Level::Middle, Level::Senior];

    /// Integer code stored in the label array.
    pub fn code(self) -> i64 {
        match self {
            Level::Junior => 0,
            Level::Middle => 1,
            Level::Senior => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Level::Junior),
            1 => Some(Level::Middle),
            2 => Some(Level::Senior),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Middle => "middle",
            Level::Senior => "senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit level keywords in the position text win; otherwise tenure decides.
#[derive(Debug, Clone)]
pub struct LevelClassifier {
    senior: Vec<String>,
    junior: Vec<String>,
}

impl LevelClassifier {
    pub fn new(config: &PipelineConfig) -> Self {
        let lower = |v: &[String]| -> Vec<String> { v.iter().map(|k| k.to_lowercase()).collect() };
        Self {
            senior: lower(&config.senior_keywords),
            junior: lower(&config.junior_keywords),
        }
    }

    /// Level named explicitly in the text, if any. Senior keywords are checked first.
    pub fn level_from_text(&self, position_text: &str) -> Option<Level> {
        let lowered = position_text.to_lowercase();
        if self.senior.iter().any(|kw| lowered.contains(kw.as_str())) {
            return Some(Level::Senior);
        }
        if self.junior.iter().any(|kw| lowered.contains(kw.as_str())) {
            return Some(Level::Junior);
        }
        None
    }

    pub fn classify(&self, experience_months: Option<f64>, position_text: &str) -> Level {
        if let Some(level) = self.level_from_text(position_text) {
            return level;
        }
        match experience_months {
            Some(m) if !m.is_nan() && m >= 12.0 => {
                if m <= 36.0 {
                    Level::Middle
                } else {
                    Level::Senior
                }
            }
            _ => Level::Junior,
        }
    }
}
