//! Domain errors for the configuration store.

use thiserror::Error;

use crate::domain::keys::EntityKind;
use crate::domain::ports::KvError;

/// Rejected caller input. Raised before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid label format: segment '{segment}' has no ':' separator")]
    InvalidLabelFormat { segment: String },
}

/// Errors returned by store and label-matching operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}/{version}")]
    NotFound {
        kind: EntityKind,
        id: String,
        version: String,
    },

    #[error("{kind} already exists: {id}/{version}")]
    AlreadyExists {
        kind: EntityKind,
        id: String,
        version: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: &str, version: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
            version: version.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// True only for a malformed label query.
    pub fn is_invalid_label_format(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(InvalidInputError::InvalidLabelFormat { .. })
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<KvError> for StoreError {
    fn from(err: KvError) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Storage(format!("serialization failed: {err}"))
    }
}
