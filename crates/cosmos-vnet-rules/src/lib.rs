//! # Cosmos DB Virtual Network Rules
//!
//! Provisions a virtual network and a database account that only trusts traffic from its
//! subnets, rewrites the trust rules, and tears everything down again, with cleanup of the
//! resource group guaranteed on every exit path.
//!
//! - [`orchestrator`]: the run itself, step by step
//! - [`arm`]: the [`ResourceManager`](arm::ResourceManager) API the run talks to
//! - [`lifecycle`]: the in-process control plane serving that API
//! - [`model`], [`clients`] and the `*_actor` modules: resources and their actors
//! - [`config`]: credentials and layered settings

pub mod arm;
pub mod clients;
pub mod config;
pub mod database_account_actor;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod names;
pub mod network_actor;
pub mod orchestrator;
pub mod resource_group_actor;

pub use error::SampleError;
pub use orchestrator::{CleanupOutcome, Orchestrator, RunOutcome, RunReport};
