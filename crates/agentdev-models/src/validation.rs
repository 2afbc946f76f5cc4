//! Field validation shared by requests and records.

use thiserror::Error;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

/// Requires a non-blank value.
pub fn require_non_blank(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

/// Limits the length in characters (not bytes).
pub fn require_max_len(field: &str, value: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> ValidationResult {
    require_non_blank(field, value)?;
    require_max_len(field, value, NAME_MAX_LEN)
}

pub fn validate_description(value: &str) -> ValidationResult {
    require_max_len("description", value, DESCRIPTION_MAX_LEN)
}

pub fn validate_percentage(field: &str, value: f64) -> ValidationResult {
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::new(field, "must be between 0 and 100"));
    }
    Ok(())
}

/// Minimal structural email check: one `@` with text on both sides and a dot in the domain.
pub fn validate_email(value: &str) -> ValidationResult {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::new("email", "is not a valid email address"));
    };
    let domain_ok = !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("email", "is not a valid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let err = validate_name("name", "   ").unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_name_length_counts_chars() {
        let name: String = "é".repeat(NAME_MAX_LEN);
        assert!(validate_name("name", &name).is_ok());

        let name: String = "a".repeat(NAME_MAX_LEN + 1);
        assert!(validate_name("name", &name).is_err());
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(validate_percentage("progress_percentage", 0.0).is_ok());
        assert!(validate_percentage("progress_percentage", 100.0).is_ok());
        assert!(validate_percentage("progress_percentage", 100.5).is_err());
        assert!(validate_percentage("progress_percentage", -1.0).is_err());
        assert!(validate_percentage("progress_percentage", f64::NAN).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@example").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }
}
