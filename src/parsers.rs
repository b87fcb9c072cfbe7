//! Per-field parsers for raw résumé cells.
//!
//! Every parser accepts `Option<&str>` (a missing cell is `None`) and never
//! fails: unrecognised input yields `None` or a neutral default.

use regex::Regex;

use crate::config::{CurrencyRate, PipelineConfig};

/// Year components above this are treated as parse artifacts and zeroed.
const MAX_PLAUSIBLE_YEARS: u64 = 100;
const NOT_SPECIFIED: &str = "не указано";

#[derive(Debug, Clone)]
pub struct FieldParsers {
    years: Regex,
    months: Regex,
    rates: Vec<CurrencyRate>,
    male_token: String,
}

impl FieldParsers {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            years: Regex::new(r"(?i)(\d+)\s+(?:год|года|лет)").expect("valid years regex"),
            months: Regex::new(r"(?i)(\d+)\s+(?:месяц|месяца|месяцев)")
                .expect("valid months regex"),
            rates: config
                .currency_rates
                .iter()
                .map(|r| CurrencyRate::new(&r.marker.to_uppercase(), r.rate))
                .collect(),
            male_token: config.male_token.clone(),
        }
    }

    /// Age in years from text such as `"Мужчина , 42 года"`.
    pub fn age(&self, text: Option<&str>) -> Option<f64> {
        let caps = self.years.captures(text?)?;
        caps[1].parse::<u64>().ok().map(|v| v as f64)
    }

    /// Total experience in months: `years * 12 + months`.
    pub fn experience_months(&self, text: Option<&str>) -> Option<f64> {
        let lowered = text?.to_lowercase();
        if lowered.contains(NOT_SPECIFIED) {
            return None;
        }

        let years = self.years.captures(&lowered);
        let months = self.months.captures(&lowered);
        if years.is_none() && months.is_none() {
            return None;
        }

        let years = years
            .and_then(|c| c[1].parse::<u64>().ok())
            .filter(|y| *y <= MAX_PLAUSIBLE_YEARS)
            .unwrap_or(0);
        // a month count too large for u64 is garbage, not zero
        let months = match months {
            Some(c) => c[1].parse::<u64>().ok()?,
            None => 0,
        };
        let total = years.checked_mul(12)?.checked_add(months)?;
        Some(total as f64)
    }

    /// Desired salary converted to rubles.
    ///
    /// All digits in the cell are concatenated, so ranges like `"50 000 - 70 000"`
    /// collapse into a single number. Only the first currency marker found in
    /// table order is applied.
    pub fn salary(&self, text: Option<&str>) -> Option<f64> {
        let text = text?;
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let amount = digits.parse::<f64>().ok()?;

        let upper = text.to_uppercase();
        let rate = self
            .rates
            .iter()
            .find(|r| upper.contains(&r.marker))
            .map_or(1.0, |r| r.rate);
        Some(amount * rate)
    }

    /// 1 when the gender/age text names a male applicant.
    pub fn is_male(&self, text: Option<&str>) -> u8 {
        match text {
            Some(t) if t.contains(&self.male_token) => 1,
            _ => 0,
        }
    }
}

/// Text before the first comma, trimmed; empty for missing cells.
pub fn city(text: Option<&str>) -> String {
    text.and_then(|t| t.split(',').next())
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsers() -> FieldParsers {
        FieldParsers::new(&PipelineConfig::default())
    }

    #[test]
    fn test_age_from_gender_age_text() {
        let p = parsers();
        assert_eq!(
            p.age(Some("Мужчина ,  42 года , родился 6 октября 1976")),
            Some(42.0)
        );
        assert_eq!(p.age(Some("Женщина , 25 лет")), Some(25.0));
        assert_eq!(p.age(Some("Женщина")), None);
        assert_eq!(p.age(None), None);
    }

    #[test]
    fn test_experience_years_and_months() {
        let p = parsers();
        assert_eq!(p.experience_months(Some("3 года 4 месяца")), Some(40.0));
        assert_eq!(p.experience_months(Some("15 лет")), Some(180.0));
        assert_eq!(p.experience_months(Some("Опыт работы 7 месяцев")), Some(7.0));
    }

    #[test]
    fn test_experience_zeroes_implausible_years() {
        let p = parsers();
        assert_eq!(p.experience_months(Some("150 лет 5 месяцев")), Some(5.0));
    }

    #[test]
    fn test_experience_overflowing_month_count_is_missing() {
        let p = parsers();
        assert_eq!(
            p.experience_months(Some("2 года 18446744073709551615 месяцев")),
            None
        );
        assert_eq!(
            p.experience_months(Some("99999999999999999999 месяцев")),
            None
        );
    }

    #[test]
    fn test_experience_missing_cases() {
        let p = parsers();
        assert_eq!(p.experience_months(Some("Не указано")), None);
        assert_eq!(p.experience_months(Some("много опыта")), None);
        assert_eq!(p.experience_months(None), None);
    }

    #[test]
    fn test_salary_currency_conversion() {
        let p = parsers();
        assert_eq!(p.salary(Some("200 USD")), Some(18000.0));
        assert_eq!(p.salary(Some("100 EUR")), Some(9800.0));
        assert_eq!(p.salary(Some("50000")), Some(50000.0));
        assert_eq!(p.salary(Some("50 000 руб.")), Some(50000.0));
        assert_eq!(p.salary(Some("1000 грн.")), Some(2500.0));
        assert_eq!(p.salary(Some("100000 kzt")), Some(20000.0));
    }

    #[test]
    fn test_salary_first_marker_in_table_order_wins() {
        let p = parsers();
        assert_eq!(p.salary(Some("10 EUR или USD")), Some(900.0));
    }

    #[test]
    fn test_salary_without_digits_is_missing() {
        let p = parsers();
        assert_eq!(p.salary(Some("по договоренности")), None);
        assert_eq!(p.salary(None), None);
    }

    #[test]
    fn test_is_male() {
        let p = parsers();
        assert_eq!(p.is_male(Some("Мужчина , 30 лет")), 1);
        assert_eq!(p.is_male(Some("Женщина , 30 лет")), 0);
        assert_eq!(p.is_male(None), 0);
    }

    #[test]
    fn test_city() {
        assert_eq!(city(Some("Москва , м. Тверская , готов к переезду")), "Москва");
        assert_eq!(city(Some("  Казань ")), "Казань");
        assert_eq!(city(None), "");
    }
}
