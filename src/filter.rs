use crate::config::PipelineConfig;

/// Recall-oriented IT-role predicate: any configured keyword appearing as a
/// substring of the lowercased position text. False positives such as `go`
/// inside unrelated words are accepted.
#[derive(Debug, Clone)]
pub struct ItFilter {
    keywords: Vec<String>,
}

impl ItFilter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            keywords: config.it_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_it(&self, position_text: Option<&str>) -> bool {
        let Some(text) = position_text else {
            return false;
        };
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|kw| lowered.contains(kw.as_str()))
    }
}
