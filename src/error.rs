use serde::Serialize;
use thiserror::Error;

/// Input problems detected before scoring.
///
/// Scorers never return these: they clamp. Validators collect them so a
/// caller can report every bad field in one response.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreError {
    #[error("{field}: {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field}: must be a finite number")]
    NotFinite { field: String },

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ScoreError {
    pub fn field(&self) -> &str {
        match self {
            ScoreError::OutOfRange { field, .. }
            | ScoreError::NotFinite { field }
            | ScoreError::Invalid { field, .. } => field,
        }
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ScoreError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ValidationResult = std::result::Result<(), Vec<ScoreError>>;
