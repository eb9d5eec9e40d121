//! Validation helpers shared by every entity mutation.
//!
//! Each helper either returns the validated value or a [`ValidationError`]
//! naming the offending field. Callers validate every field first and only
//! then commit, so a failed validation never leaves partial state behind.

use rust_decimal::Decimal;
use std::fmt::Display;
use thiserror::Error;

/// Errors raised when a field value is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required numeric field was given no value
    #[error("{field} must be a non-negative number (received nothing)")]
    TypeMismatch { field: String },

    /// A value is negative or outside its permitted set
    #[error("{field} {reason} (received {received})")]
    InvalidValue {
        field: String,
        reason: String,
        received: String,
    },
}

impl ValidationError {
    /// Name of the field that failed validation
    pub fn field(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { field } => field,
            ValidationError::InvalidValue { field, .. } => field,
        }
    }
}

/// Validate a required non-negative number.
///
/// `None` fails with [`ValidationError::TypeMismatch`], a negative value with
/// [`ValidationError::InvalidValue`]. Only lossless conversions into
/// [`Decimal`] are accepted, so no binary floating point reaches the ledger.
pub fn non_negative<V: Into<Decimal>>(
    name: &str,
    value: Option<V>,
) -> Result<Decimal, ValidationError> {
    optional_non_negative(name, value)?.ok_or_else(|| ValidationError::TypeMismatch {
        field: name.to_string(),
    })
}

/// Validate an optional non-negative number, passing `None` through.
pub fn optional_non_negative<V: Into<Decimal>>(
    name: &str,
    value: Option<V>,
) -> Result<Option<Decimal>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let value = value.into();
    if value < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: name.to_string(),
            reason: "must not be negative".to_string(),
            received: value.to_string(),
        });
    }

    Ok(Some(value))
}

/// Validate that `value` is one of `permitted`, returning it unchanged.
pub fn validate_member<T, P>(
    name: &str,
    value: T,
    permitted: impl IntoIterator<Item = P>,
) -> Result<T, ValidationError>
where
    T: Display,
    P: PartialEq<T> + Display,
{
    let permitted: Vec<P> = permitted.into_iter().collect();
    if permitted.iter().any(|candidate| *candidate == value) {
        return Ok(value);
    }

    let choices = permitted
        .iter()
        .map(|candidate| candidate.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Err(ValidationError::InvalidValue {
        field: name.to_string(),
        reason: format!("must be one of [{}]", choices),
        received: value.to_string(),
    })
}
