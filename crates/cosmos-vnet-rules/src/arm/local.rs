//! In-process [`ResourceManager`] backed by the [`ControlPlane`] actors.
//!
//! # Scope ordering
//! Deleting a resource group must not race a create that is still landing inside it. Every
//! mutation that targets a group's contents holds the shared half of `gate` while it checks
//! the parent and writes; group deletion takes the exclusive half, so it starts only after
//! in-flight work is done and every later create sees the group gone.

use super::{ArmError, ArmOperation, ResourceManager};
use crate::clients::ResourceGroupClient;
use crate::config::{Credentials, SampleSettings};
use crate::lifecycle::ControlPlane;
use crate::model::{
    DatabaseAccount, DatabaseAccountCreate, DatabaseAccountUpdate, ResourceGroup,
    ResourceGroupCreate, ResourceId, VirtualNetwork, VirtualNetworkCreate, VirtualNetworkRule,
};
use async_trait::async_trait;
use resource_actors::{ActorClient, Operation, WaitUntil};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Checks the credentials and resolves the subscription they grant access to.
fn authenticate(credentials: &Credentials) -> Result<String, ArmError> {
    for (field, value) in [
        ("client id", &credentials.client_id),
        ("tenant id", &credentials.tenant_id),
        ("subscription id", &credentials.subscription_id),
    ] {
        Uuid::parse_str(value)
            .map_err(|_| ArmError::Authentication(format!("{} '{}' is not a GUID", field, value)))?;
    }
    if credentials.client_secret.trim().is_empty() {
        return Err(ArmError::Authentication("client secret is empty".to_string()));
    }
    Ok(credentials.subscription_id.clone())
}

fn found<T>(resource: Option<T>, id: &ResourceId) -> Result<T, ArmError> {
    resource.ok_or_else(|| ArmError::NotFound(id.to_string()))
}

async fn require_group(groups: &ResourceGroupClient, id: ResourceId) -> Result<(), ArmError> {
    match groups.get(id.clone()).await? {
        Some(_) => Ok(()),
        None => Err(ArmError::NotFound(format!("resource group {}", id))),
    }
}

/// A [`ResourceManager`] served by actors running in this process.
pub struct LocalResourceManager {
    plane: ControlPlane,
    /// Outcome of authentication at connect time; every call checks it first.
    auth: Result<String, ArmError>,
    latency: Duration,
    gate: Arc<RwLock<()>>,
}

impl LocalResourceManager {
    /// Starts the control plane and authenticates `credentials`.
    ///
    /// Rejected credentials do not fail here: like a real client, the rejection surfaces on
    /// the first call.
    pub fn connect(credentials: &Credentials, settings: &SampleSettings) -> Self {
        let auth = authenticate(credentials);
        match &auth {
            Ok(subscription) => info!(%subscription, "Connected to local control plane"),
            Err(e) => warn!(error = %e, "Credentials rejected"),
        }
        Self {
            plane: ControlPlane::new(),
            auth,
            latency: settings.provisioning_delay(),
            gate: Arc::new(RwLock::new(())),
        }
    }

    /// The actors behind this manager, for inspection.
    pub fn control_plane(&self) -> &ControlPlane {
        &self.plane
    }

    /// Stops every actor after in-flight operations have finished.
    pub async fn shutdown(self) -> Result<(), ArmError> {
        self.plane
            .shutdown()
            .await
            .map_err(|e| ArmError::Transport(e.to_string()))
    }

    fn subscription(&self) -> Result<&str, ArmError> {
        self.auth.as_deref().map_err(Clone::clone)
    }

    /// Rejects requests outside the authenticated subscription.
    fn authorize(&self, target: &ResourceId) -> Result<(), ArmError> {
        let subscription = self.subscription()?;
        if !target.subscription_id().eq_ignore_ascii_case(subscription) {
            return Err(ArmError::Authentication(format!(
                "not authorized for subscription '{}'",
                target.subscription_id()
            )));
        }
        Ok(())
    }

    async fn start<T, F>(&self, wait_until: WaitUntil, work: F) -> ArmOperation<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ArmError>> + Send + 'static,
    {
        Operation::start(wait_until, self.latency, work).await
    }
}

#[async_trait]
impl ResourceManager for LocalResourceManager {
    async fn default_subscription(&self) -> Result<String, ArmError> {
        self.subscription().map(str::to_string)
    }

    async fn create_resource_group(
        &self,
        params: ResourceGroupCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<ResourceGroup>, ArmError> {
        self.authorize(&ResourceId::subscription(&params.subscription_id))?;
        let groups = self.plane.resource_groups.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                let id = groups.create_group(params).await?;
                found(groups.get(id.clone()).await?, &id)
            })
            .await)
    }

    async fn delete_resource_group(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        self.authorize(&id)?;
        let groups = self.plane.resource_groups.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _exclusive = gate.write_owned().await;
                groups.delete(id).await?;
                Ok(())
            })
            .await)
    }

    async fn create_virtual_network(
        &self,
        params: VirtualNetworkCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<VirtualNetwork>, ArmError> {
        self.authorize(&params.resource_group)?;
        let groups = self.plane.resource_groups.clone();
        let networks = self.plane.networks.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                require_group(&groups, params.resource_group.clone()).await?;
                let id = networks.create_network(params).await?;
                found(networks.get(id.clone()).await?, &id)
            })
            .await)
    }

    async fn delete_virtual_network(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        self.authorize(&id)?;
        let networks = self.plane.networks.clone();
        let accounts = self.plane.accounts.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                let trusted_by: Vec<String> = accounts
                    .list()
                    .await?
                    .into_iter()
                    .filter(|a| a.virtual_network_rules.iter().any(|r| r.subnet_id.is_within(&id)))
                    .map(|a| a.id.to_string())
                    .collect();
                if !trusted_by.is_empty() {
                    return Err(ArmError::Conflict(format!(
                        "subnets of {} are in use by {}",
                        id,
                        trusted_by.join(", ")
                    )));
                }
                networks.delete(id).await?;
                Ok(())
            })
            .await)
    }

    async fn create_database_account(
        &self,
        params: DatabaseAccountCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError> {
        self.authorize(&params.resource_group)?;
        let groups = self.plane.resource_groups.clone();
        let accounts = self.plane.accounts.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                require_group(&groups, params.resource_group.clone()).await?;
                let id = accounts.create_account(params).await?;
                found(accounts.get(id.clone()).await?, &id)
            })
            .await)
    }

    async fn get_database_account(&self, id: ResourceId) -> Result<DatabaseAccount, ArmError> {
        self.authorize(&id)?;
        found(self.plane.accounts.get(id.clone()).await?, &id)
    }

    async fn update_database_account(
        &self,
        id: ResourceId,
        update: DatabaseAccountUpdate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError> {
        self.authorize(&id)?;
        let accounts = self.plane.accounts.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                Ok(accounts.update_account(id, update).await?)
            })
            .await)
    }

    async fn list_virtual_network_rules(
        &self,
        account: ResourceId,
    ) -> Result<Vec<VirtualNetworkRule>, ArmError> {
        self.authorize(&account)?;
        Ok(self.plane.accounts.virtual_network_rules(account).await?)
    }

    async fn delete_database_account(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        self.authorize(&id)?;
        let accounts = self.plane.accounts.clone();
        let gate = self.gate.clone();
        Ok(self
            .start(wait_until, async move {
                let _shared = gate.read_owned().await;
                accounts.delete(id).await?;
                Ok(())
            })
            .await)
    }
}
