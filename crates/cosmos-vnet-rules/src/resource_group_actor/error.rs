//! Error types for the resource group actor.

use resource_actors::FrameworkError;
use thiserror::Error;

/// Errors that can occur during resource group operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResourceGroupError {
    #[error("Resource group not found: {0}")]
    NotFound(String),

    #[error("Resource group already exists: {0}")]
    AlreadyExists(String),

    #[error("Resource group validation error: {0}")]
    ValidationError(String),

    /// A contained resource could not be deleted; the group is kept.
    #[error("Failed to delete {resource} in resource group: {reason}")]
    CascadeFailed { resource: String, reason: String },

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ResourceGroupError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ResourceGroupError::NotFound(id),
            FrameworkError::Conflict(id) => ResourceGroupError::AlreadyExists(id),
            FrameworkError::EntityError(_) => e
                .entity_error::<ResourceGroupError>()
                .cloned()
                .unwrap_or_else(|| ResourceGroupError::ValidationError(e.to_string())),
            other => ResourceGroupError::ActorCommunicationError(other.to_string()),
        }
    }
}
