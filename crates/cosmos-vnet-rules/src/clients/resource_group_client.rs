//! # Resource Group Client
//!
//! High-level API for the resource group actor.
use crate::model::{ResourceGroup, ResourceGroupCreate, ResourceId};
use crate::resource_group_actor::{ResourceGroupAction, ResourceGroupActionResult, ResourceGroupError};
use async_trait::async_trait;
use resource_actors::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the resource group actor.
#[derive(Clone)]
pub struct ResourceGroupClient {
    inner: ResourceClient<ResourceGroup>,
}

impl ResourceGroupClient {
    pub fn new(inner: ResourceClient<ResourceGroup>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_group(&self, params: ResourceGroupCreate) -> Result<ResourceId, ResourceGroupError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Identifiers of every resource inside the group.
    #[instrument(skip(self))]
    pub async fn resources(&self, id: ResourceId) -> Result<Vec<ResourceId>, ResourceGroupError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(id, ResourceGroupAction::ListResources)
            .await
            .map_err(Self::map_error)?;
        match result {
            ResourceGroupActionResult::Resources(ids) => Ok(ids),
        }
    }
}

#[async_trait]
impl ActorClient<ResourceGroup> for ResourceGroupClient {
    type Error = ResourceGroupError;

    fn inner(&self) -> &ResourceClient<ResourceGroup> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ResourceGroupError::from(e)
    }
}
