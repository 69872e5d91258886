//! # Resource Actors
//!
//! Building blocks for an in-process control plane: every resource kind (resource group,
//! virtual network, database account, …) is owned by one actor that serves the verbs a
//! resource manager exposes (create, get, update, delete, list, plus resource-specific
//! actions), and every mutation issued through the manager is tracked as a long-running
//! [`Operation`].
//!
//! ## Architecture Overview
//!
//! 1. **Resource Layer** ([`ManagedResource`]) - validation and lifecycle hooks of one resource kind
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential request processing over an owned store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe requests
//! 4. **Operation Layer** ([`Operation`], [`WaitUntil`]) - completion handles for slow mutations
//!
//! ## Addressing
//!
//! Resources are addressed by name, not by a counter: [`ManagedResource::id_for`] derives the
//! identifier from the creation payload, and creating an identifier that already exists fails
//! with [`FrameworkError::Conflict`].
//!
//! ## Context Injection
//!
//! Dependencies are injected at `run()` time. A resource group actor receives the clients of
//! its child resource kinds so its `on_delete` hook can cascade:
//!
//! ```rust,ignore
//! let (network_actor, network_client) = ResourceActor::<VirtualNetwork>::new(32);
//! let (group_actor, group_client) = ResourceActor::<ResourceGroup>::new(32);
//!
//! tokio::spawn(network_actor.run(()));
//! tokio::spawn(group_actor.run(GroupContext { networks: network_client.clone() }));
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and processes one request at a time
//! - Actors of different kinds run in parallel
//! - No shared mutable state; the store is owned by the actor task
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockClient`, which answers requests from scripted
//! expectations instead of a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod operation;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ManagedResource;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use operation::{Operation, OperationStatus, WaitUntil};
