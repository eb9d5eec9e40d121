use stocks_core::{Symbol, ValidationError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// A field value was missing, negative or outside its permitted set
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation is undefined in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A stock was used as if listed while it has no exchange; a kind of
    /// invalid operation
    #[error("Stock {0} is not associated with an exchange")]
    Unassociated(Symbol),
}

impl ExchangeError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            ExchangeError::Validation(ValidationError::TypeMismatch { .. })
        )
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(
            self,
            ExchangeError::Validation(ValidationError::InvalidValue { .. })
        )
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            ExchangeError::InvalidOperation(_) | ExchangeError::Unassociated(_)
        )
    }

    pub fn is_unassociated(&self) -> bool {
        matches!(self, ExchangeError::Unassociated(_))
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
