//! Validation utilities.

use crate::{FieldError, StorefrontError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `StorefrontError` on failure.
    fn validate_request(&self) -> Result<(), StorefrontError> {
        self.validate().map_err(validation_errors_to_storefront_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
///
/// Nested struct errors are reported with a dotted path.
#[must_use]
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect_into(errors, None, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_into(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => (*field).to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|error| FieldError {
                    field: path.clone(),
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                    code: error.code.to_string(),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_into(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_into(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Converts `validator::ValidationErrors` to `StorefrontError`.
#[must_use]
pub fn validation_errors_to_storefront_error(errors: ValidationErrors) -> StorefrontError {
    StorefrontError::InvalidFields(collect_field_errors(&errors))
}

/// Common validation functions.
pub mod rules {
    use bigdecimal::{BigDecimal, Zero};
    use std::borrow::Cow;
    use validator::ValidationError;

    fn error(code: &'static str, message: &'static str) -> ValidationError {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err
    }

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(error("not_blank", "This field may not be blank."));
        }
        Ok(())
    }

    /// Validates that a password is strong enough to accept.
    ///
    /// At least eight characters, not entirely numeric, and containing at
    /// least one letter and one digit. Similarity to the username or email
    /// is checked by the account service, which knows both values.
    pub fn password_strength(password: &str) -> Result<(), ValidationError> {
        if password.chars().count() < 8 {
            return Err(error(
                "password_too_short",
                "This password is too short. It must contain at least 8 characters.",
            ));
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(error("password_entirely_numeric", "This password is entirely numeric."));
        }
        if !password.chars().any(char::is_alphabetic) {
            return Err(error("password_missing_letter", "This password must contain a letter."));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(error("password_missing_digit", "This password must contain a digit."));
        }
        Ok(())
    }

    /// Validates a username: letters, digits and `@ . + - _`, at most 150 characters.
    pub fn valid_username(username: &str) -> Result<(), ValidationError> {
        if username.chars().count() > 150 {
            return Err(error("username_too_long", "Ensure this field has no more than 150 characters."));
        }
        if username.is_empty()
            || !username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(error(
                "username_invalid_characters",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            ));
        }
        Ok(())
    }

    /// Validates that a URL is absolute and uses the `http` or `https` scheme.
    pub fn http_url(value: &str) -> Result<(), ValidationError> {
        match url::Url::parse(value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => Ok(()),
            _ => Err(error("invalid_url", "URL must start with http:// or https://")),
        }
    }

    /// Validates that a price is zero or positive.
    pub fn non_negative_price(price: &BigDecimal) -> Result<(), ValidationError> {
        if price < &BigDecimal::zero() {
            return Err(error("negative_price", "Price cannot be negative"));
        }
        Ok(())
    }

    /// Validates that a price fits a `DECIMAL(10, 2)` column.
    pub fn price_precision(price: &BigDecimal) -> Result<(), ValidationError> {
        let (digits, scale) = price.normalized().as_bigint_and_exponent();
        if scale > 2 {
            return Err(error("price_scale", "Ensure that there are no more than 2 decimal places."));
        }
        let integer_digits = i64::try_from(digits.magnitude().to_string().len()).unwrap_or(i64::MAX) - scale;
        if integer_digits > 8 {
            return Err(error("price_digits", "Ensure that there are no more than 8 digits before the decimal point."));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[derive(Validate)]
    struct Sample {
        #[validate(custom(function = "http_url"))]
        url: String,
        #[validate(custom(function = "non_negative_price"))]
        price: BigDecimal,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(password_strength("secret123").is_ok());
        assert!(password_strength("short1").is_err());
        assert!(password_strength("1234567890").is_err());
        assert!(password_strength("onlyletters").is_err());
    }

    #[test]
    fn test_valid_username() {
        assert!(valid_username("john_doe").is_ok());
        assert!(valid_username("john.doe+shop@x").is_ok());
        assert!(valid_username("john doe").is_err());
        assert!(valid_username("").is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(http_url("https://example.com/item/1").is_ok());
        assert!(http_url("http://shop.local").is_ok());
        assert!(http_url("invalid-url").is_err());
        assert!(http_url("ftp://example.com").is_err());
        assert!(http_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_price_rules() {
        assert!(non_negative_price(&BigDecimal::from_str("0").unwrap()).is_ok());
        assert!(non_negative_price(&BigDecimal::from_str("19.99").unwrap()).is_ok());
        assert!(non_negative_price(&BigDecimal::from_str("-10.00").unwrap()).is_err());
        assert!(price_precision(&BigDecimal::from_str("12345678.99").unwrap()).is_ok());
        assert!(price_precision(&BigDecimal::from_str("1.999").unwrap()).is_err());
        assert!(price_precision(&BigDecimal::from_str("123456789").unwrap()).is_err());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let sample = Sample {
            url: "invalid-url".to_string(),
            price: BigDecimal::from_str("-10.00").unwrap(),
        };
        let err = sample.validate_request().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "price");
        assert_eq!(fields[0].message, "Price cannot be negative");
        assert_eq!(fields[1].field, "url");
        assert_eq!(fields[1].code, "invalid_url");
    }
}
