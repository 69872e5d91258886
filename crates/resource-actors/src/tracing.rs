//! # Observability
//!
//! Structured logging for the actors and everything that drives them.
//!
//! Every actor logs its lifecycle (`Actor started`, `Shutdown`) and each resource operation
//! (`Created`, `Updated`, `Deleted`) with the resource identifier as a field, so a single run
//! reads as a timeline of control-plane calls:
//!
//! ```text
//! INFO Actor started resource_type="ResourceGroup"
//! INFO Created resource_type="ResourceGroup" id=/subscriptions/…/resourceGroups/rg1 size=1
//! INFO Created resource_type="VirtualNetwork" id=/subscriptions/…/virtualNetworks/vnet1 size=1
//! ```
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact progress lines (default)
//! RUST_LOG=debug cargo run     # Include request payloads
//! RUST_LOG=resource_actors=debug,info cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Falls back to `info` when `RUST_LOG` is not set.
///
/// Calling it a second time is a no-op, which keeps tests that share a process happy.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
