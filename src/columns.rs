//! Fuzzy header resolution.

use crate::config::ColumnNeedles;
use crate::error::PipelineError;

/// Index of the first header containing `needle`, skipping `exclude`.
pub fn resolve_column(
    headers: &[String],
    needle: &str,
    exclude: &[usize],
) -> Result<usize, PipelineError> {
    headers
        .iter()
        .enumerate()
        .find(|(idx, h)| !exclude.contains(idx) && h.contains(needle))
        .map(|(idx, _)| idx)
        .ok_or_else(|| PipelineError::ColumnNotFound {
            needle: needle.to_string(),
            available: headers.to_vec(),
        })
}

/// Resolved positions of every required logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub gender_age: usize,
    pub salary: usize,
    pub experience: usize,
    pub city: usize,
    pub desired_position: usize,
    pub last_position: usize,
}

impl ColumnMap {
    /// Resolve all required columns; the first missing one aborts resolution.
    ///
    /// The last-position lookup skips the desired-position column, whose
    /// header usually contains the same word.
    pub fn resolve(headers: &[String], needles: &ColumnNeedles) -> Result<Self, PipelineError> {
        let desired_position = resolve_column(headers, &needles.desired_position, &[])?;
        Ok(Self {
            gender_age: resolve_column(headers, &needles.gender_age, &[])?,
            salary: resolve_column(headers, &needles.salary, &[])?,
            experience: resolve_column(headers, &needles.experience, &[])?,
            city: resolve_column(headers, &needles.city, &[])?,
            desired_position,
            last_position: resolve_column(headers, &needles.last_position, &[desired_position])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hh_headers() -> Vec<String> {
        [
            "Unnamed: 0",
            "Пол, возраст",
            "ЗП",
            "Ищет работу на должность:",
            "Город",
            "Занятость",
            "Опыт (двойное нажатие для полной версии)",
            "Последенее/нынешнее место работы",
            "Последеняя/нынешняя должность",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_resolve_hh_headers() {
        let map = ColumnMap::resolve(&hh_headers(), &ColumnNeedles::default()).unwrap();
        assert_eq!(map.gender_age, 1);
        assert_eq!(map.salary, 2);
        assert_eq!(map.desired_position, 3);
        assert_eq!(map.city, 4);
        assert_eq!(map.experience, 6);
        assert_eq!(map.last_position, 8);
    }

    #[test]
    fn test_missing_column_is_typed_error() {
        let headers: Vec<String> = vec!["Город".to_string()];
        let err = resolve_column(&headers, "ЗП", &[]).unwrap_err();
        match err {
            PipelineError::ColumnNotFound { needle, available } => {
                assert_eq!(needle, "ЗП");
                assert_eq!(available, headers);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exclusion_without_alternative_fails() {
        let headers: Vec<String> = vec!["Ищет работу на должность:".to_string()];
        assert!(resolve_column(&headers, "должность", &[0]).is_err());
        assert_eq!(resolve_column(&headers, "должность", &[]).unwrap(), 0);
    }
}
