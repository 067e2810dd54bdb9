use crate::error::{FarmError, FarmResult};
use chrono::NaiveDate;

/// Trimmed, non-empty text or a validation error naming the field.
pub fn required_text(value: &str, label: &str) -> FarmResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FarmError::Validation(format!("{} is required", label)));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as NULL.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn positive_number(value: f64, label: &str) -> FarmResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FarmError::Validation(format!(
            "{} must be a positive number",
            label
        )))
    }
}

pub fn non_negative_number(value: f64, label: &str) -> FarmResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FarmError::Validation(format!("{} cannot be negative", label)))
    }
}

/// `YYYY-MM-DD`; blank means no date.
pub fn parse_optional_date(value: Option<&str>, label: &str) -> FarmResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| FarmError::Validation(format!("Invalid {}: {}", label, e))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_helpers_trim() {
        assert_eq!(required_text("  North Plot ", "Name").unwrap(), "North Plot");
        assert!(matches!(
            required_text("   ", "Name"),
            Err(FarmError::Validation(msg)) if msg == "Name is required"
        ));
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" Drip ".into())), Some("Drip".into()));
    }

    #[test]
    fn number_checks() {
        assert!(positive_number(4.5, "Area").is_ok());
        assert!(positive_number(0.0, "Area").is_err());
        assert!(positive_number(f64::NAN, "Area").is_err());
        assert!(non_negative_number(0.0, "Stock").is_ok());
        assert!(non_negative_number(-1.0, "Stock").is_err());
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_optional_date(Some("2025-07-23"), "date").unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 23)
        );
        assert_eq!(parse_optional_date(Some(" "), "date").unwrap(), None);
        assert_eq!(parse_optional_date(None, "date").unwrap(), None);
        assert!(parse_optional_date(Some("23/07/2025"), "date").is_err());
    }
}
