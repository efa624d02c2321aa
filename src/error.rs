//! Error types.
//!
//! | Error | Raised by | Policy |
//! |-------|-----------|--------|
//! | `Validation` | create / move / resize | returned to the caller |
//! | `Reference` | move / resize on a missing id | returned; delete is a no-op instead |
//! | `Storage` | snapshot load / write-through | load: returned; write: logged, retried |
//! | `Config` | `TimelineConfig::validate` | returned at construction |
//!
//! Misaligned slot times are not errors; see
//! [`RenderabilityWarning`](crate::layout::RenderabilityWarning).

use std::fmt;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by timeline operations.
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Assignment not found: {id}")]
    Reference { id: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type TimelineResult<T> = Result<T, TimelineError>;

impl TimelineError {
    pub fn reference(id: impl Into<String>) -> Self {
        Self::Reference { id: id.into() }
    }

    /// Validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            Self::Validation(errors) => Some(&errors.0),
            _ => None,
        }
    }
}

impl From<Vec<ValidationError>> for TimelineError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(ValidationErrors(errors))
    }
}

impl From<ValidationError> for TimelineError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(ValidationErrors(vec![error]))
    }
}

/// All problems found by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Durable store failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Store backend error: {0}")]
    Backend(String),
}
