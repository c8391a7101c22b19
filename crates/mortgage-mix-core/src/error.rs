use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageMixError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("No mixes to compare")]
    EmptyComparison,

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageMixError {
    fn from(e: serde_json::Error) -> Self {
        MortgageMixError::SerializationError(e.to_string())
    }
}

impl MortgageMixError {
    /// Arithmetic on `field` left the representable decimal range.
    pub(crate) fn overflow(field: &str) -> Self {
        MortgageMixError::InvalidInput {
            field: field.into(),
            reason: "Value overflows decimal range".into(),
        }
    }
}
