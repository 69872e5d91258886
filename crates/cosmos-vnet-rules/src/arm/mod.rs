//! # Resource Manager
//!
//! [`ResourceManager`] is the surface of the cloud resource-management API the sample is
//! written against. Mutations are long-running: each returns an [`ArmOperation`] once the
//! request is accepted, and the caller decides through [`WaitUntil`] whether the call itself
//! blocks until the operation is terminal.
//!
//! - [`LocalResourceManager`] serves the API from the in-process control plane.
//! - [`RecordingResourceManager`] wraps another manager, records every call and can inject
//!   failures.

pub mod local;
pub mod recording;

pub use local::LocalResourceManager;
pub use recording::{Call, CallKind, RecordingResourceManager};

use crate::database_account_actor::DatabaseAccountError;
use crate::model::{
    DatabaseAccount, DatabaseAccountCreate, DatabaseAccountUpdate, ResourceGroup,
    ResourceGroupCreate, ResourceId, VirtualNetwork, VirtualNetworkCreate, VirtualNetworkRule,
};
use crate::network_actor::NetworkError;
use crate::resource_group_actor::ResourceGroupError;
use async_trait::async_trait;
use resource_actors::{FrameworkError, Operation, WaitUntil};
use thiserror::Error;

/// Errors returned by a [`ResourceManager`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArmError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Long-running operation issued through a [`ResourceManager`].
pub type ArmOperation<T> = Operation<T, ArmError>;

impl From<FrameworkError> for ArmError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ArmError::NotFound(id),
            FrameworkError::Conflict(id) => ArmError::Conflict(id),
            FrameworkError::OperationAbandoned(id) => {
                ArmError::OperationFailed(format!("operation {} was abandoned", id))
            }
            FrameworkError::EntityError(inner) => ArmError::InvalidRequest(inner.to_string()),
            other => ArmError::Transport(other.to_string()),
        }
    }
}

impl From<ResourceGroupError> for ArmError {
    fn from(e: ResourceGroupError) -> Self {
        match e {
            ResourceGroupError::NotFound(id) => ArmError::NotFound(id),
            ResourceGroupError::AlreadyExists(id) => ArmError::Conflict(id),
            ResourceGroupError::ValidationError(msg) => ArmError::InvalidRequest(msg),
            e @ ResourceGroupError::CascadeFailed { .. } => ArmError::OperationFailed(e.to_string()),
            ResourceGroupError::ActorCommunicationError(msg) => ArmError::Transport(msg),
        }
    }
}

impl From<NetworkError> for ArmError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::NotFound(id) => ArmError::NotFound(id),
            NetworkError::AlreadyExists(id) => ArmError::Conflict(id),
            NetworkError::ValidationError(msg) => ArmError::InvalidRequest(msg),
            NetworkError::ActorCommunicationError(msg) => ArmError::Transport(msg),
        }
    }
}

impl From<DatabaseAccountError> for ArmError {
    fn from(e: DatabaseAccountError) -> Self {
        match e {
            DatabaseAccountError::NotFound(id) => ArmError::NotFound(id),
            DatabaseAccountError::AlreadyExists(id) => ArmError::Conflict(id),
            DatabaseAccountError::ValidationError(msg) => ArmError::InvalidRequest(msg),
            e @ DatabaseAccountError::InvalidRule { .. } => ArmError::InvalidRequest(e.to_string()),
            DatabaseAccountError::Network(inner) => ArmError::from(inner),
            DatabaseAccountError::ActorCommunicationError(msg) => ArmError::Transport(msg),
        }
    }
}

/// Client surface of the resource-management API.
///
/// Methods returning `Result<ArmOperation<_>, _>` fail immediately when the request is
/// rejected up front (credentials, scope) and otherwise report the outcome through the
/// operation.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Subscription the credentials resolve to.
    async fn default_subscription(&self) -> Result<String, ArmError>;

    async fn create_resource_group(
        &self,
        params: ResourceGroupCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<ResourceGroup>, ArmError>;

    /// Deletes the group and everything inside it.
    async fn delete_resource_group(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError>;

    async fn create_virtual_network(
        &self,
        params: VirtualNetworkCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<VirtualNetwork>, ArmError>;

    async fn delete_virtual_network(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError>;

    async fn create_database_account(
        &self,
        params: DatabaseAccountCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError>;

    async fn get_database_account(&self, id: ResourceId) -> Result<DatabaseAccount, ArmError>;

    /// Applies `update`. A rule list in the update replaces the stored one.
    async fn update_database_account(
        &self,
        id: ResourceId,
        update: DatabaseAccountUpdate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError>;

    async fn list_virtual_network_rules(
        &self,
        account: ResourceId,
    ) -> Result<Vec<VirtualNetworkRule>, ArmError>;

    async fn delete_database_account(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_errors_map_to_api_errors() {
        let rule = DatabaseAccountError::InvalidRule {
            rule: "subnet1".to_string(),
            reason: "subnet does not exist".to_string(),
        };
        assert!(matches!(ArmError::from(rule), ArmError::InvalidRequest(msg) if msg.contains("subnet1")));

        let nested = DatabaseAccountError::Network(NetworkError::ActorCommunicationError("closed".into()));
        assert_eq!(ArmError::from(nested), ArmError::Transport("closed".into()));

        let conflict = ResourceGroupError::AlreadyExists("rg".into());
        assert_eq!(ArmError::from(conflict), ArmError::Conflict("rg".into()));
    }
}
