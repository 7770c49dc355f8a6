//! Field-level validation errors for admin and sync writes.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path in the request body, e.g. `accounts[0].basePrice`.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

/// Every field error found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationFailure {
    /// Field errors ordered by field path.
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Builds a failure for a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut collected = Vec::new();
        flatten(&errors, "", &mut collected);
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        Self { errors: collected }
    }
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        // Struct-level checks report under `__all__` and name the field in the code.
        let name = if field.as_ref() == "__all__" {
            None
        } else {
            Some(to_camel_case(field))
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let field = name.clone().unwrap_or_else(|| error.code.to_string());
                    out.push(FieldError {
                        field: format!("{prefix}{field}"),
                        message: describe(error),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                let field = name.unwrap_or_default();
                flatten(inner, &format!("{prefix}{field}."), out);
            }
            ValidationErrorsKind::List(items) => {
                let field = name.unwrap_or_default();
                for (index, inner) in items {
                    flatten(inner, &format!("{prefix}{field}[{index}]."), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("length must be between {min} and {max}"),
            (Some(_), None) => "must not be empty".to_string(),
            (None, Some(max)) => format!("length must be at most {max}"),
            (None, None) => "has an invalid length".to_string(),
        },
        "url" => "must be a valid URL".to_string(),
        "range" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max}"),
            (Some(min), None) => format!("must be at least {min}"),
            (None, Some(max)) => format!("must be at most {max}"),
            (None, None) => "is out of range".to_string(),
        },
        code => format!("failed check `{code}`"),
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Runs `validator` checks and converts the result into a [`ValidationFailure`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ValidationFailure> {
    input.validate().map_err(ValidationFailure::from)
}

pub(crate) fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub(crate) fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(error(
            "slug",
            "must be lowercase letters, digits, and inner hyphens",
        ))
    }
}

pub(crate) fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(error("range", "must be between 0 and 100"));
    }
    Ok(())
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("range", "must not be negative"));
    }
    Ok(())
}
