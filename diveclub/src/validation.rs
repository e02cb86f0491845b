//! Validation Support
//!
//! Create/update payloads implement [`Validatable`] and report every problem
//! at once through [`ValidationErrors`], keyed by the form field that caused
//! it. HTML forms render the messages next to their inputs; the admin API
//! returns them as a JSON list.
//!
//! # Example
//!
//! ```rust,ignore
//! use diveclub::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for MemberPayload {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_required("email", &self.email));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Shorthand for a collection holding a single error
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Add a validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationError::new(field, message));
    }

    /// Record the error of a validator, if any
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    /// Append every error from another collection
    pub fn extend(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Messages recorded against one field, in insertion order
    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| error.message.as_str())
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

/// Trait for payloads that can be validated before they reach the database
pub trait Validatable {
    /// Validate the instance
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use rust_decimal::Decimal;

    use super::ValidationError;

    pub const REQUIRED: &str = "This field is required.";

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Fails on an empty or whitespace-only value.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, REQUIRED));
        }
        Ok(())
    }

    /// Validate string length (in characters) does not exceed `max`
    ///
    /// # Errors
    ///
    /// Fails when the value is longer than `max` characters.
    pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len > max {
            return Err(ValidationError::new(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            ));
        }
        Ok(())
    }

    /// Basic email validation: one `@`, a non-empty local part and a dotted domain
    ///
    /// # Errors
    ///
    /// Fails when the address is malformed or longer than 254 characters.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        let invalid = || ValidationError::new(field, "Enter a valid email address.");

        if value.len() > 254 || value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(invalid());
        };

        let domain_ok = !domain.contains('@')
            && domain.contains('.')
            && domain
                .split('.')
                .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));

        if local.is_empty() || !domain_ok {
            return Err(invalid());
        }

        Ok(())
    }

    /// Validate an integer is strictly positive
    ///
    /// # Errors
    ///
    /// Fails on zero or negative values.
    pub fn validate_positive(field: &str, value: i64) -> Result<(), ValidationError> {
        if value <= 0 {
            return Err(ValidationError::new(
                field,
                "Ensure this value is greater than 0.",
            ));
        }
        Ok(())
    }

    /// Validate a decimal fits a `NUMERIC(max_digits, decimal_places)` column
    ///
    /// # Errors
    ///
    /// Fails when the value has too many digits overall, too many decimal
    /// places, or too many digits before the point.
    pub fn validate_decimal_digits(
        field: &str,
        value: Decimal,
        max_digits: u32,
        decimal_places: u32,
    ) -> Result<(), ValidationError> {
        let normalized = value.normalize();
        let scale = normalized.scale();
        let integer_digits = integer_digit_count(normalized.trunc().abs());

        if scale > decimal_places {
            return Err(ValidationError::new(
                field,
                format!("Ensure that there are no more than {decimal_places} decimal places."),
            ));
        }
        if integer_digits + scale > max_digits {
            return Err(ValidationError::new(
                field,
                format!("Ensure that there are no more than {max_digits} digits in total."),
            ));
        }
        if integer_digits > max_digits - decimal_places {
            return Err(ValidationError::new(
                field,
                format!(
                    "Ensure that there are no more than {} digits before the decimal point.",
                    max_digits - decimal_places
                ),
            ));
        }
        Ok(())
    }

    fn integer_digit_count(value: Decimal) -> u32 {
        if value.is_zero() {
            return 0;
        }
        let digits = value.trunc().to_string();
        u32::try_from(digits.len()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_validation_error_creation() {
        let err = ValidationError::new("email", "Invalid email");
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Invalid email");
    }

    #[test]
    fn test_validation_errors_collection() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add(ValidationError::new("field1", "error1"));
        assert_eq!(errors.len(), 1);

        errors.push("field2", "error2");
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("field2"));
        assert_eq!(errors.messages_for("field1").collect::<Vec<_>>(), vec!["error1"]);

        assert!(errors.result().is_err());
    }

    #[test]
    fn test_check_only_records_failures() {
        let mut errors = ValidationErrors::new();
        errors.check(Ok(()));
        errors.check(validators::validate_required("name", ""));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_max_length_counts_characters() {
        use validators::validate_max_length;

        assert!(validate_max_length("name", "abcdef", 5).is_err());
        assert!(validate_max_length("name", "čćžšđ", 5).is_ok());
    }

    #[test]
    fn test_validate_email() {
        use validators::validate_email;

        assert!(validate_email("email", "invalid").is_err());
        assert!(validate_email("email", "a@b").is_err());
        assert!(validate_email("email", "@klub.hr").is_err());
        assert!(validate_email("email", "two@@klub.hr").is_err());
        assert!(validate_email("email", "with space@klub.hr").is_err());
        assert!(validate_email("email", "clan1@klub.hr").is_ok());
    }

    #[test]
    fn test_validate_required() {
        use validators::validate_required;

        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", "Ivan").is_ok());
    }

    #[test]
    fn test_validate_positive() {
        use validators::validate_positive;

        assert!(validate_positive("duration", 0).is_err());
        assert!(validate_positive("duration", -5).is_err());
        assert!(validate_positive("duration", 1).is_ok());
    }

    #[test]
    fn test_validate_decimal_digits() {
        use validators::validate_decimal_digits;

        let ok = |s: &str| validate_decimal_digits("depth", Decimal::from_str(s).unwrap(), 5, 2);

        assert!(ok("18.5").is_ok());
        assert!(ok("999.99").is_ok());
        assert!(ok("40.00").is_ok());
        assert!(ok("0").is_ok());
        assert!(ok("12.345").is_err());
        assert!(ok("1000").is_err());
        assert!(ok("1000.5").is_err());
    }
}
