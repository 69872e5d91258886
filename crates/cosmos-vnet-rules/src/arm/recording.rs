//! A [`ResourceManager`] decorator that records calls and injects failures.

use super::{ArmError, ArmOperation, ResourceManager};
use crate::model::{
    DatabaseAccount, DatabaseAccountCreate, DatabaseAccountUpdate, ResourceGroup,
    ResourceGroupCreate, ResourceId, VirtualNetwork, VirtualNetworkCreate, VirtualNetworkRule,
};
use async_trait::async_trait;
use resource_actors::{ManagedResource, Operation, WaitUntil};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// The [`ResourceManager`] method a [`Call`] went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    DefaultSubscription,
    CreateResourceGroup,
    DeleteResourceGroup,
    CreateVirtualNetwork,
    DeleteVirtualNetwork,
    CreateDatabaseAccount,
    GetDatabaseAccount,
    UpdateDatabaseAccount,
    ListVirtualNetworkRules,
    DeleteDatabaseAccount,
}

impl CallKind {
    pub fn is_deletion(self) -> bool {
        matches!(
            self,
            CallKind::DeleteResourceGroup
                | CallKind::DeleteVirtualNetwork
                | CallKind::DeleteDatabaseAccount
        )
    }
}

/// One recorded call and the resource it addressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub kind: CallKind,
    /// `None` only for [`CallKind::DefaultSubscription`].
    pub target: Option<ResourceId>,
}

struct Failure {
    kind: CallKind,
    nth: usize,
    error: ArmError,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wraps a manager, recording every call in order before forwarding it.
///
/// ```rust,ignore
/// let manager = RecordingResourceManager::new(local)
///     .fail_on(CallKind::CreateDatabaseAccount, 1, ArmError::Conflict("quota".into()));
/// ```
pub struct RecordingResourceManager<M> {
    inner: M,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<Vec<Failure>>,
}

impl<M: ResourceManager> RecordingResourceManager<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Fails the `nth` (1-based) call of `kind` with `error` instead of forwarding it.
    /// Mutations fail through their operation, reads fail directly.
    pub fn fail_on(self, kind: CallKind, nth: usize, error: ArmError) -> Self {
        lock(&self.failures).push(Failure { kind, nth, error });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        lock(&self.calls).iter().filter(|c| c.kind == kind).count()
    }

    /// Deletion calls in the order they were issued.
    pub fn deletions(&self) -> Vec<Call> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.kind.is_deletion())
            .cloned()
            .collect()
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }

    /// Records the call and returns the failure scripted for it, if any.
    fn record(&self, kind: CallKind, target: Option<ResourceId>) -> Option<ArmError> {
        let nth = {
            let mut calls = lock(&self.calls);
            calls.push(Call { kind, target });
            calls.iter().filter(|c| c.kind == kind).count()
        };
        let mut failures = lock(&self.failures);
        let index = failures.iter().position(|f| f.kind == kind && f.nth == nth)?;
        let failure = failures.remove(index);
        debug!(?kind, nth, error = %failure.error, "Injecting failure");
        Some(failure.error)
    }
}

async fn failed<T: Send + 'static>(wait_until: WaitUntil, error: ArmError) -> ArmOperation<T> {
    Operation::start(wait_until, Duration::ZERO, async move { Err(error) }).await
}

#[async_trait]
impl<M: ResourceManager> ResourceManager for RecordingResourceManager<M> {
    async fn default_subscription(&self) -> Result<String, ArmError> {
        if let Some(error) = self.record(CallKind::DefaultSubscription, None) {
            return Err(error);
        }
        self.inner.default_subscription().await
    }

    async fn create_resource_group(
        &self,
        params: ResourceGroupCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<ResourceGroup>, ArmError> {
        let target = ResourceGroup::id_for(&params);
        if let Some(error) = self.record(CallKind::CreateResourceGroup, Some(target)) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.create_resource_group(params, wait_until).await
    }

    async fn delete_resource_group(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        if let Some(error) = self.record(CallKind::DeleteResourceGroup, Some(id.clone())) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.delete_resource_group(id, wait_until).await
    }

    async fn create_virtual_network(
        &self,
        params: VirtualNetworkCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<VirtualNetwork>, ArmError> {
        let target = VirtualNetwork::id_for(&params);
        if let Some(error) = self.record(CallKind::CreateVirtualNetwork, Some(target)) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.create_virtual_network(params, wait_until).await
    }

    async fn delete_virtual_network(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        if let Some(error) = self.record(CallKind::DeleteVirtualNetwork, Some(id.clone())) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.delete_virtual_network(id, wait_until).await
    }

    async fn create_database_account(
        &self,
        params: DatabaseAccountCreate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError> {
        let target = DatabaseAccount::id_for(&params);
        if let Some(error) = self.record(CallKind::CreateDatabaseAccount, Some(target)) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.create_database_account(params, wait_until).await
    }

    async fn get_database_account(&self, id: ResourceId) -> Result<DatabaseAccount, ArmError> {
        if let Some(error) = self.record(CallKind::GetDatabaseAccount, Some(id.clone())) {
            return Err(error);
        }
        self.inner.get_database_account(id).await
    }

    async fn update_database_account(
        &self,
        id: ResourceId,
        update: DatabaseAccountUpdate,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<DatabaseAccount>, ArmError> {
        if let Some(error) = self.record(CallKind::UpdateDatabaseAccount, Some(id.clone())) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.update_database_account(id, update, wait_until).await
    }

    async fn list_virtual_network_rules(
        &self,
        account: ResourceId,
    ) -> Result<Vec<VirtualNetworkRule>, ArmError> {
        if let Some(error) = self.record(CallKind::ListVirtualNetworkRules, Some(account.clone())) {
            return Err(error);
        }
        self.inner.list_virtual_network_rules(account).await
    }

    async fn delete_database_account(
        &self,
        id: ResourceId,
        wait_until: WaitUntil,
    ) -> Result<ArmOperation<()>, ArmError> {
        if let Some(error) = self.record(CallKind::DeleteDatabaseAccount, Some(id.clone())) {
            return Ok(failed(wait_until, error).await);
        }
        self.inner.delete_database_account(id, wait_until).await
    }
}
