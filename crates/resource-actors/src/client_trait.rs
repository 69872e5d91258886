//! # ActorClient Trait
//!
//! Common interface for resource-specific clients: default `get`, `list` and `delete`
//! built on top of the wrapped `ResourceClient`.
use crate::{FrameworkError, ManagedResource, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the read and delete verbs.
///
/// Implementors provide access to the inner `ResourceClient` and a mapping from
/// [`FrameworkError`] into their own error type; everything else comes for free.
#[async_trait]
pub trait ActorClient<T: ManagedResource>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a resource by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// List every resource of this kind.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    /// Delete a resource by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
