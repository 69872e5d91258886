//! # ManagedResource Trait
//!
//! The `ManagedResource` trait is the contract every resource kind (resource group, virtual
//! network, database account, …) implements to be hosted by the generic [`ResourceActor`].
//!
//! Unlike a database row, a control-plane resource is addressed by *name*: creating a
//! resource whose identifier already exists is a conflict, not a new row. The trait therefore
//! asks the resource to derive its identifier from the creation payload ([`ManagedResource::id_for`])
//! instead of handing out sequential numbers.
//!
//! # Provided Methods (Hooks)
//! - [`ManagedResource::on_create`]
//! - [`ManagedResource::on_delete`]
//!
//! The default implementations do nothing (`Ok(())`).
//!
//! [`ResourceActor`]: crate::ResourceActor

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any control-plane resource must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context` type is injected
/// into every hook at `run()` time, which lets a resource group reach the clients of its
/// child resources without wiring them at construction.
#[async_trait]
pub trait ManagedResource: Clone + Send + Sync + 'static {
    /// Fully qualified identifier of the resource.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Payload describing the resource to create.
    type Create: Send + Sync + Debug;

    /// Payload describing a mutation of an existing resource.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations outside of CRUD.
    type Action: Send + Sync + Debug;

    /// Result of a custom action.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into the actor. Use `()` if none are needed.
    type Context: Send + Sync;

    /// Per-resource error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Derives the identifier the resource will be stored under.
    fn id_for(params: &Self::Create) -> Self::Id;

    /// Builds the resource from its identifier and creation payload.
    /// Called synchronously before `on_create`; validation of the payload belongs here.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the resource becomes visible.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the resource is removed. Failing here keeps the resource.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handles a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
