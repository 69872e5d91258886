use crate::clients::{DatabaseAccountClient, NetworkClient, ResourceGroupClient};
use crate::resource_group_actor::GroupContext;
use crate::{database_account_actor, network_actor, resource_group_actor};
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// The in-process control plane: one actor per resource kind, wired together.
///
/// # Architecture
///
/// - **Network actor**: virtual networks and their subnets, no dependencies
/// - **Database account actor**: accounts; validates rules against the network actor
/// - **Resource group actor**: groups; cascades deletes into both actors above
///
/// # Example
///
/// ```ignore
/// let plane = ControlPlane::new();
/// let group = plane.resource_groups.create_group(params).await?;
/// plane.shutdown().await?;
/// ```
pub struct ControlPlane {
    pub resource_groups: ResourceGroupClient,
    pub networks: NetworkClient,
    pub accounts: DatabaseAccountClient,

    /// Actor tasks in shutdown order: dependents first.
    handles: Vec<JoinHandle<()>>,
}

impl Default for ControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPlane {
    /// Spawns every actor. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (network_actor, networks) = network_actor::new();
        let (account_actor, accounts) = database_account_actor::new();
        let (group_actor, resource_groups) = resource_group_actor::new();

        let network_handle = tokio::spawn(network_actor.run(()));
        let account_handle = tokio::spawn(account_actor.run(networks.clone()));
        let group_handle = tokio::spawn(group_actor.run(GroupContext {
            networks: networks.clone(),
            accounts: accounts.clone(),
        }));

        Self {
            resource_groups,
            networks,
            accounts,
            handles: vec![group_handle, account_handle, network_handle],
        }
    }

    /// Drops the clients and waits for every actor to drain its queue and stop.
    ///
    /// Actors holding clients of other actors in their context release them when they stop,
    /// so awaiting the dependents first lets the whole graph wind down.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down control plane...");

        drop(self.resource_groups);
        drop(self.accounts);
        drop(self.networks);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("Control plane shutdown complete.");
        Ok(())
    }
}
