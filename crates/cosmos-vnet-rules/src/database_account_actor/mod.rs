//! Database account resource logic.
//!
//! The actor runs with a [`NetworkClient`](crate::clients::NetworkClient) as context so virtual network rules can be
//! checked against live subnets.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::DatabaseAccountClient;
use crate::model::DatabaseAccount;
use resource_actors::ResourceActor;

/// Creates a new database account actor and its client.
///
/// Start it with `actor.run(network_client)`.
pub fn new() -> (ResourceActor<DatabaseAccount>, DatabaseAccountClient) {
    let (actor, generic_client) = ResourceActor::new(32);
    (actor, DatabaseAccountClient::new(generic_client))
}
