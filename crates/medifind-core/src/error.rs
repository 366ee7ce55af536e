//! Error types for the MediFind core.
//!
//! Client mistakes (a missing required parameter) and broken dataset
//! invariants are kept apart so the HTTP layer can map them to 400 and 500.

use std::fmt;

use thiserror::Error;

/// Message returned when a search has no usable `q`.
pub const MISSING_QUERY: &str = "Missing query parameter q";

/// Message returned when an alternatives request has no usable `name`.
pub const MISSING_NAME: &str = "Missing name parameter";

/// Which collection an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Pharmacy,
    Medicine,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Pharmacy => f.pad("pharmacy"),
            EntityKind::Medicine => f.pad("medicine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediFindError {
    /// A required request parameter was missing or blank.
    #[error("{message}")]
    Validation { message: String },

    /// An inventory row points at an id that is not in the dataset.
    #[error("inventory references unknown {kind} id: {id}")]
    DanglingReference { kind: EntityKind, id: String },

    /// Two records in one collection share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: String },
}

impl MediFindError {
    pub fn validation(message: impl Into<String>) -> Self {
        MediFindError::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller rather than the dataset.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MediFindError::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, MediFindError>;
