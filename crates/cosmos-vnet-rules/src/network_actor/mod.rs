//! # Virtual Network Actor
//!
//! Owns every virtual network of the control plane and answers subnet lookups for the
//! database account actor.
//!
//! - [`entity`] - [`ManagedResource`](resource_actors::ManagedResource) implementation for [`VirtualNetwork`]
//! - [`error`] - [`NetworkError`]
//! - [`actions`] - [`NetworkAction`] / [`NetworkActionResult`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::NetworkClient;
use crate::model::VirtualNetwork;
use resource_actors::ResourceActor;

/// Creates a new virtual network actor and its client.
pub fn new() -> (ResourceActor<VirtualNetwork>, NetworkClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    (actor, NetworkClient::new(generic_client))
}
