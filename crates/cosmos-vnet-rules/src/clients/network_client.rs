//! # Network Client
//!
//! High-level API for the virtual network actor.
use crate::model::{ResourceId, Subnet, VirtualNetwork, VirtualNetworkCreate, VirtualNetworkUpdate};
use crate::network_actor::{NetworkAction, NetworkActionResult, NetworkError};
use async_trait::async_trait;
use resource_actors::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the virtual network actor.
#[derive(Clone)]
pub struct NetworkClient {
    inner: ResourceClient<VirtualNetwork>,
}

impl NetworkClient {
    pub fn new(inner: ResourceClient<VirtualNetwork>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_network(&self, params: VirtualNetworkCreate) -> Result<ResourceId, NetworkError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_network(
        &self,
        id: ResourceId,
        update: VirtualNetworkUpdate,
    ) -> Result<VirtualNetwork, NetworkError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Looks up a subnet of `network` by name. `Ok(None)` means the network exists but has
    /// no such subnet.
    #[instrument(skip(self))]
    pub async fn subnet(&self, network: ResourceId, name: &str) -> Result<Option<Subnet>, NetworkError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(network, NetworkAction::Subnet(name.to_string()))
            .await
            .map_err(Self::map_error)?;
        match result {
            NetworkActionResult::Subnet(subnet) => Ok(subnet),
        }
    }
}

#[async_trait]
impl ActorClient<VirtualNetwork> for NetworkClient {
    type Error = NetworkError;

    fn inner(&self) -> &ResourceClient<VirtualNetwork> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        NetworkError::from(e)
    }
}
