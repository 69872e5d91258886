//! # Provisioning Orchestrator
//!
//! One run walks a fixed sequence of steps against a [`ResourceManager`]:
//!
//! 1. resolve the subscription the credentials grant
//! 2. create a uniquely named resource group (the *scope*)
//! 3. create a virtual network with two subnets open to the database service
//! 4. create a database account trusting the first subnet
//! 5. read the rules back: exactly subnet 1
//! 6. trust both subnets (read the current rules, then write them back plus subnet 2)
//! 7. read the rules back: exactly {subnet 1, subnet 2}
//!    - 7a. optionally clear the rules and check that none are left
//!    - 7b. then delete the network
//! 8. optionally delete the database account
//!
//! Settings are validated before step 1; invalid settings fail the run without a call.
//!
//! Any failure stops the sequence. Whatever happened, [`Orchestrator::cleanup`] runs once
//! with the scope identifier captured in step 2, if there is one, and deletes the group with
//! everything still inside it.
//!
//! The scope is threaded through as a value: [`Orchestrator::acquire_scope`] returns it,
//! [`Orchestrator::provision`] borrows it and `cleanup` receives it as an `Option`.

use crate::arm::{ArmError, ArmOperation, ResourceManager};
use crate::config::SampleSettings;
use crate::error::SampleError;
use crate::model::{
    ApiKind, DatabaseAccountCreate, DatabaseAccountUpdate, Region, ResourceGroupCreate, ResourceId,
    ServiceEndpoint, SubnetSpec, VirtualNetworkCreate, VirtualNetworkRule,
};
use resource_actors::WaitUntil;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// A step of a run, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResolveSubscription,
    CreateResourceGroup,
    CreateVirtualNetwork,
    CreateDatabaseAccount,
    ListRulesAfterCreate,
    TrustSecondSubnet,
    ListRulesAfterUpdate,
    ClearRules,
    ListRulesAfterClear,
    DeleteVirtualNetwork,
    DeleteDatabaseAccount,
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Step::ResolveSubscription => "resolving the subscription",
            Step::CreateResourceGroup => "creating the resource group",
            Step::CreateVirtualNetwork => "creating the virtual network",
            Step::CreateDatabaseAccount => "creating the database account",
            Step::ListRulesAfterCreate => "listing rules after create",
            Step::TrustSecondSubnet => "adding the second subnet rule",
            Step::ListRulesAfterUpdate => "listing rules after update",
            Step::ClearRules => "removing all rules",
            Step::ListRulesAfterClear => "listing rules after removal",
            Step::DeleteVirtualNetwork => "deleting the virtual network",
            Step::DeleteDatabaseAccount => "deleting the database account",
        };
        f.write_str(text)
    }
}

/// The scope created by step 2; the only state cleanup needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedScope {
    pub subscription_id: String,
    pub resource_group: ResourceId,
}

/// What the run observed on its way through.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub resource_group: ResourceId,
    pub virtual_network: ResourceId,
    pub database_account: ResourceId,
    pub database_kind: ApiKind,
    pub write_locations: Vec<Region>,
    pub rules_after_create: Vec<VirtualNetworkRule>,
    pub rules_after_update: Vec<VirtualNetworkRule>,
    /// `None` when rule removal is switched off.
    pub rules_after_clear: Option<Vec<VirtualNetworkRule>>,
}

/// Result of the cleanup phase. Never an error: cleanup failures are reported, not raised.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupOutcome {
    /// No scope was captured, so there was nothing to delete.
    NothingToClean,
    Deleted(ResourceId),
    Failed { id: ResourceId, error: ArmError },
}

/// Outcome of [`Orchestrator::run`]: the primary result and, separately, the cleanup.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: Result<RunReport, SampleError>,
    pub cleanup: CleanupOutcome,
}

impl RunOutcome {
    pub fn into_result(self) -> Result<RunReport, SampleError> {
        self.result
    }
}

/// Issues a long-running call and waits for its terminal state.
async fn complete<T, F>(step: Step, started: F) -> Result<T, SampleError>
where
    T: Send + 'static,
    F: Future<Output = Result<ArmOperation<T>, ArmError>>,
{
    let operation = started.await.map_err(|e| SampleError::at(step, e))?;
    debug!(%step, operation_id = operation.id(), "Waiting for operation");
    operation.wait().await.map_err(|e| SampleError::at(step, e))
}

/// Checks that `rules` trust exactly `expected`, ignoring order.
fn expect_rules(
    step: Step,
    rules: &[VirtualNetworkRule],
    expected: &[&ResourceId],
) -> Result<(), SampleError> {
    let actual: BTreeSet<&ResourceId> = rules.iter().map(|r| &r.subnet_id).collect();
    let wanted: BTreeSet<&ResourceId> = expected.iter().copied().collect();
    if rules.len() != expected.len() || actual != wanted {
        return Err(SampleError::UnexpectedState {
            step,
            detail: format!(
                "expected rules for {:?}, found {:?}",
                wanted.iter().map(|id| id.name()).collect::<Vec<_>>(),
                rules.iter().map(|r| r.subnet_id.name()).collect::<Vec<_>>()
            ),
        });
    }
    Ok(())
}

/// Drives one provisioning run against `M`.
pub struct Orchestrator<M> {
    manager: M,
    settings: SampleSettings,
}

impl<M: ResourceManager> Orchestrator<M> {
    pub fn new(manager: M, settings: SampleSettings) -> Self {
        Self { manager, settings }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn into_manager(self) -> M {
        self.manager
    }

    /// Runs every step, then cleans up.
    ///
    /// Steps 3 onwards race `cancel`; when it fires first the run stops with
    /// [`SampleError::Cancelled`] and cleanup still runs to completion. Creating the scope
    /// is not raced, so a group that is being created is always captured.
    pub async fn run<C>(&self, cancel: C) -> RunOutcome
    where
        C: Future<Output = ()> + Send,
    {
        if let Err(e) = self.settings.validate() {
            error!(error = %e, "Invalid settings");
            return RunOutcome {
                result: Err(e),
                cleanup: CleanupOutcome::NothingToClean,
            };
        }

        let scope = self.acquire_scope().await;
        let scope_id = scope.as_ref().ok().map(|s| s.resource_group.clone());

        let result = match scope {
            Ok(scope) => {
                tokio::select! {
                    report = self.provision(&scope) => report,
                    _ = cancel => {
                        warn!(resource_group = %scope.resource_group, "Cancellation requested");
                        Err(SampleError::Cancelled)
                    }
                }
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!(error = %e, details = ?e, "Run failed");
        }
        let cleanup = self.cleanup(scope_id.as_ref()).await;
        RunOutcome { result, cleanup }
    }

    /// Steps 1 and 2: resolve the subscription and create the resource group.
    pub async fn acquire_scope(&self) -> Result<ProvisionedScope, SampleError> {
        let subscription_id = self
            .manager
            .default_subscription()
            .await
            .map_err(|e| SampleError::at(Step::ResolveSubscription, e))?;
        info!(subscription = %subscription_id, "Using subscription");

        let name = self.settings.resource_group_name();
        info!(resource_group = %name, region = %self.settings.region, "Creating resource group");
        let group = complete(
            Step::CreateResourceGroup,
            self.manager.create_resource_group(
                ResourceGroupCreate::new(&subscription_id, name, self.settings.region),
                WaitUntil::Completed,
            ),
        )
        .await?;
        info!(resource_id = %group.id, "Created resource group");

        Ok(ProvisionedScope {
            subscription_id,
            resource_group: group.id,
        })
    }

    /// Steps 3 to 8, inside `scope`.
    pub async fn provision(&self, scope: &ProvisionedScope) -> Result<RunReport, SampleError> {
        let settings = &self.settings;
        let group = &scope.resource_group;

        let network_name = settings.network_name();
        info!(network = %network_name, "Creating virtual network");
        let subnets = settings
            .subnets
            .iter()
            .map(|s| {
                SubnetSpec::new(&s.name, &s.address_prefix)
                    .with_access_from(ServiceEndpoint::CosmosDb)
            })
            .collect();
        let network = complete(
            Step::CreateVirtualNetwork,
            self.manager.create_virtual_network(
                VirtualNetworkCreate {
                    resource_group: group.clone(),
                    name: network_name,
                    location: settings.region,
                    address_space: settings.address_space.clone(),
                    subnets,
                },
                WaitUntil::Completed,
            ),
        )
        .await?;
        info!(resource_id = %network.id, address_space = %network.address_space, "Created virtual network");
        for subnet in &network.subnets {
            info!(
                subnet = %subnet.name,
                address_prefix = %subnet.address_prefix,
                endpoints = ?subnet.service_endpoints,
                "Subnet"
            );
        }

        let subnet_id = |index: usize| -> Result<ResourceId, SampleError> {
            let name = &settings
                .subnets
                .get(index)
                .ok_or_else(|| {
                    SampleError::Config(format!(
                        "at least two subnets are required, got {}",
                        settings.subnets.len()
                    ))
                })?
                .name;
            network
                .subnet(name)
                .map(|s| s.id.clone())
                .ok_or_else(|| SampleError::UnexpectedState {
                    step: Step::CreateVirtualNetwork,
                    detail: format!("subnet {} missing from {}", name, network.id),
                })
        };
        let subnet1 = subnet_id(0)?;
        let subnet2 = subnet_id(1)?;

        let database_name = settings.database_name();
        info!(database = %database_name, region = %settings.database_region, "Creating database account");
        let account = complete(
            Step::CreateDatabaseAccount,
            self.manager.create_database_account(
                DatabaseAccountCreate {
                    resource_group: group.clone(),
                    name: database_name,
                    location: settings.database_region,
                    kind: settings.api_kind,
                    consistency: settings.consistency(),
                    write_locations: vec![settings.write_region],
                    virtual_network_rules: vec![VirtualNetworkRule::new(subnet1.clone())],
                },
                WaitUntil::Completed,
            ),
        )
        .await?;
        info!(
            resource_id = %account.id,
            kind = ?account.kind,
            consistency = ?account.consistency.level,
            max_staleness_prefix = account.consistency.max_staleness_prefix,
            max_interval_in_seconds = account.consistency.max_interval_in_seconds,
            location = %account.location,
            write_locations = ?account.write_locations,
            "Created database account"
        );

        let rules_after_create = self.read_rules(Step::ListRulesAfterCreate, &account.id).await?;
        expect_rules(Step::ListRulesAfterCreate, &rules_after_create, &[&subnet1])?;

        // Updates replace the list, so the current rules go back in with the new one.
        let mut rules = self
            .manager
            .get_database_account(account.id.clone())
            .await
            .map_err(|e| SampleError::at(Step::TrustSecondSubnet, e))?
            .virtual_network_rules;
        rules.push(VirtualNetworkRule::new(subnet2.clone()));
        info!(resource_id = %account.id, rules = rules.len(), "Updating virtual network rules");
        self.update_rules(Step::TrustSecondSubnet, &account.id, rules).await?;

        let rules_after_update = self.read_rules(Step::ListRulesAfterUpdate, &account.id).await?;
        expect_rules(Step::ListRulesAfterUpdate, &rules_after_update, &[&subnet1, &subnet2])?;

        let rules_after_clear = if settings.clear_rules_before_delete {
            info!(resource_id = %account.id, "Removing all virtual network rules");
            self.update_rules(Step::ClearRules, &account.id, Vec::new()).await?;
            let cleared = self.read_rules(Step::ListRulesAfterClear, &account.id).await?;
            expect_rules(Step::ListRulesAfterClear, &cleared, &[])?;

            info!(resource_id = %network.id, "Deleting virtual network");
            complete(
                Step::DeleteVirtualNetwork,
                self.manager
                    .delete_virtual_network(network.id.clone(), WaitUntil::Completed),
            )
            .await?;
            Some(cleared)
        } else {
            None
        };

        if settings.delete_database_explicitly {
            info!(resource_id = %account.id, "Deleting database account");
            complete(
                Step::DeleteDatabaseAccount,
                self.manager
                    .delete_database_account(account.id.clone(), WaitUntil::Completed),
            )
            .await?;
        }

        Ok(RunReport {
            resource_group: group.clone(),
            virtual_network: network.id,
            database_account: account.id,
            database_kind: account.kind,
            write_locations: account.write_locations,
            rules_after_create,
            rules_after_update,
            rules_after_clear,
        })
    }

    /// Deletes the scope, if one was captured, and waits for the deletion to finish.
    pub async fn cleanup(&self, scope: Option<&ResourceId>) -> CleanupOutcome {
        let Some(id) = scope else {
            info!("Did not create any resources. No clean up is necessary");
            return CleanupOutcome::NothingToClean;
        };

        info!(resource_group = %id, "Deleting resource group");
        let deleted = match self
            .manager
            .delete_resource_group(id.clone(), WaitUntil::Completed)
            .await
        {
            Ok(operation) => operation.wait().await,
            Err(e) => Err(e),
        };

        match deleted {
            Ok(()) => {
                info!(resource_group = %id, "Deleted resource group");
                CleanupOutcome::Deleted(id.clone())
            }
            Err(e) => {
                error!(resource_group = %id, error = %e, details = ?e, "Failed to delete resource group");
                CleanupOutcome::Failed {
                    id: id.clone(),
                    error: e,
                }
            }
        }
    }

    async fn read_rules(
        &self,
        step: Step,
        account: &ResourceId,
    ) -> Result<Vec<VirtualNetworkRule>, SampleError> {
        let rules = self
            .manager
            .list_virtual_network_rules(account.clone())
            .await
            .map_err(|e| SampleError::at(step, e))?;
        info!(resource_id = %account, rules = rules.len(), "Listed virtual network rules");
        for rule in &rules {
            info!(subnet = %rule.subnet_id, "Virtual network rule");
        }
        Ok(rules)
    }

    async fn update_rules(
        &self,
        step: Step,
        account: &ResourceId,
        rules: Vec<VirtualNetworkRule>,
    ) -> Result<(), SampleError> {
        let update = DatabaseAccountUpdate {
            virtual_network_rules: Some(rules),
            ..Default::default()
        };
        complete(
            step,
            self.manager
                .update_database_account(account.clone(), update, WaitUntil::Completed),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subnet(name: &str) -> ResourceId {
        ResourceId::subscription("sub")
            .resource_group("rg")
            .provider("Microsoft.Network", "virtualNetworks", "vnet")
            .child("subnets", name)
    }

    #[test]
    fn test_rule_expectations_ignore_order() {
        let (a, b) = (subnet("a"), subnet("b"));
        let rules = vec![VirtualNetworkRule::new(b.clone()), VirtualNetworkRule::new(a.clone())];
        assert!(expect_rules(Step::ListRulesAfterUpdate, &rules, &[&a, &b]).is_ok());
    }

    #[test]
    fn test_rule_expectations_catch_duplicates_and_strays() {
        let (a, b) = (subnet("a"), subnet("b"));
        let duplicated = vec![VirtualNetworkRule::new(a.clone()), VirtualNetworkRule::new(a.clone())];
        assert!(expect_rules(Step::ListRulesAfterUpdate, &duplicated, &[&a, &b]).is_err());

        let stray = vec![VirtualNetworkRule::new(b.clone())];
        let err = expect_rules(Step::ListRulesAfterCreate, &stray, &[&a]).unwrap_err();
        assert!(matches!(err, SampleError::UnexpectedState { step: Step::ListRulesAfterCreate, .. }));
        assert!(expect_rules(Step::ListRulesAfterClear, &[], &[]).is_ok());
    }
}
