//! Error types for the village crate.
//!
//! Rendering never fails: any text is legal input. The errors here cover
//! post validation (surfaced to users), gateway failures (logged by callers)
//! and dispatcher hand-off.

use thiserror::Error;

use crate::village::{RelationshipId, StudentId};

/// Validation errors that occur before a post is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Posts are limited to {limit} characters.")]
    PostTooLong {
        limit: usize,
    },

    #[error("Relationship {relationship} does not belong to the village of student {student}")]
    RelationshipNotInVillage {
        relationship: RelationshipId,
        student: StudentId,
    },
}

/// Errors reported by an SMS gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmsError {
    #[error("SMS to {phone} was rejected: {message}")]
    Rejected {
        phone: String,
        message: String,
    },

    #[error("SMS gateway unavailable: {message}")]
    Unavailable {
        message: String,
    },
}

/// Errors from the background SMS dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("SMS queue is full (capacity: {capacity})")]
    QueueFull {
        capacity: usize,
    },

    #[error("SMS dispatcher is shut down")]
    Disconnected,

    #[error("Failed to spawn SMS worker: {message}")]
    Spawn {
        message: String,
    },
}

impl From<DispatchError> for SmsError {
    fn from(err: DispatchError) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum VillageError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl VillageError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a dispatcher error.
    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Dispatch(e) => matches!(e, DispatchError::QueueFull { .. }),
        }
    }

    /// The message shown to the person who submitted a post, if any.
    ///
    /// Only validation failures are user-facing.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Validation(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// Result type alias for village operations.
pub type VillageResult<T> = Result<T, VillageError>;
