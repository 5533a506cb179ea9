//! Error types shared by the calculation engine and its loaders

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("ARM configuration is required when loan type is ARM")]
    MissingArmConfig,

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MortgageError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        MortgageError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Standard result type for all engine operations
pub type MortgageResult<T> = Result<T, MortgageError>;
