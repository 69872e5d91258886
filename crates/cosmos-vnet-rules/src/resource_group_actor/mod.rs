//! # Resource Group Actor
//!
//! Owns the resource groups. Its context holds the clients of the contained resource kinds,
//! which the delete hook uses to cascade.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::GroupContext;
pub use error::*;

use crate::clients::ResourceGroupClient;
use crate::model::ResourceGroup;
use resource_actors::ResourceActor;

/// Creates a new resource group actor and its client.
pub fn new() -> (ResourceActor<ResourceGroup>, ResourceGroupClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    (actor, ResourceGroupClient::new(generic_client))
}
