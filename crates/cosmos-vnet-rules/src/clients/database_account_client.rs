//! # Database Account Client
//!
//! High-level API for the database account actor.
use crate::database_account_actor::{
    DatabaseAccountAction, DatabaseAccountActionResult, DatabaseAccountError,
};
use crate::model::{
    DatabaseAccount, DatabaseAccountCreate, DatabaseAccountUpdate, ResourceId, VirtualNetworkRule,
};
use async_trait::async_trait;
use resource_actors::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the database account actor.
#[derive(Clone)]
pub struct DatabaseAccountClient {
    inner: ResourceClient<DatabaseAccount>,
}

impl DatabaseAccountClient {
    pub fn new(inner: ResourceClient<DatabaseAccount>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_account(
        &self,
        params: DatabaseAccountCreate,
    ) -> Result<ResourceId, DatabaseAccountError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_account(
        &self,
        id: ResourceId,
        update: DatabaseAccountUpdate,
    ) -> Result<DatabaseAccount, DatabaseAccountError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn virtual_network_rules(
        &self,
        id: ResourceId,
    ) -> Result<Vec<VirtualNetworkRule>, DatabaseAccountError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(id, DatabaseAccountAction::ListVirtualNetworkRules)
            .await
            .map_err(Self::map_error)?;
        match result {
            DatabaseAccountActionResult::VirtualNetworkRules(rules) => Ok(rules),
        }
    }
}

#[async_trait]
impl ActorClient<DatabaseAccount> for DatabaseAccountClient {
    type Error = DatabaseAccountError;

    fn inner(&self) -> &ResourceClient<DatabaseAccount> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        DatabaseAccountError::from(e)
    }
}
