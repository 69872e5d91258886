//! Error types for the virtual network actor.

use resource_actors::FrameworkError;
use thiserror::Error;

/// Errors that can occur during virtual network operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    #[error("Virtual network not found: {0}")]
    NotFound(String),

    #[error("Virtual network already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid virtual network: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for NetworkError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => NetworkError::NotFound(id),
            FrameworkError::Conflict(id) => NetworkError::AlreadyExists(id),
            FrameworkError::EntityError(_) => e
                .entity_error::<NetworkError>()
                .cloned()
                .unwrap_or_else(|| NetworkError::ValidationError(e.to_string())),
            other => NetworkError::ActorCommunicationError(other.to_string()),
        }
    }
}
