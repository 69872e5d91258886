//! Error types for the database account actor.

use crate::network_actor::NetworkError;
use resource_actors::FrameworkError;
use thiserror::Error;

/// Errors that can occur during database account operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatabaseAccountError {
    #[error("Database account not found: {0}")]
    NotFound(String),

    #[error("Database account already exists: {0}")]
    AlreadyExists(String),

    #[error("Database account validation error: {0}")]
    ValidationError(String),

    /// A virtual network rule names a subnet that is missing or not reachable.
    #[error("Invalid virtual network rule {rule}: {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Network lookup failed: {0}")]
    Network(#[from] NetworkError),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for DatabaseAccountError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => DatabaseAccountError::NotFound(id),
            FrameworkError::Conflict(id) => DatabaseAccountError::AlreadyExists(id),
            FrameworkError::EntityError(_) => e
                .entity_error::<DatabaseAccountError>()
                .cloned()
                .unwrap_or_else(|| DatabaseAccountError::ValidationError(e.to_string())),
            other => DatabaseAccountError::ActorCommunicationError(other.to_string()),
        }
    }
}
