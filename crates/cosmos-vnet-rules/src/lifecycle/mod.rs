//! # Control Plane Lifecycle
//!
//! Starting, wiring and stopping the resource actors.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created without dependencies and receive them at `run(context)` time:
//!
//! ```rust,ignore
//! impl ManagedResource for VirtualNetwork {
//!     type Context = ();
//! }
//!
//! impl ManagedResource for DatabaseAccount {
//!     type Context = NetworkClient;   // rule validation
//! }
//!
//! impl ManagedResource for ResourceGroup {
//!     type Context = GroupContext;    // cascade delete
//! }
//! ```
//!
//! The dependency graph is acyclic (groups -> accounts -> networks), so dropping the clients
//! held by [`ControlPlane`] shuts everything down: each actor stops when its channel closes
//! and releases the clients in its context.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the `tracing` subscriber. Verbosity follows `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cosmos-vnet-rules     # one line per step
//! RUST_LOG=debug cosmos-vnet-rules    # every actor request
//! ```

pub mod control_plane;

pub use control_plane::*;
pub use resource_actors::tracing::setup_tracing;
