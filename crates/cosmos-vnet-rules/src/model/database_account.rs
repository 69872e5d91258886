use crate::model::{Region, ResourceId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Read consistency offered by a database account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    Eventual,
    Session,
    BoundedStaleness,
    Strong,
    ConsistentPrefix,
}

/// Bounds accepted for bounded-staleness consistency.
pub const STALENESS_PREFIX_RANGE: std::ops::RangeInclusive<u64> = 10..=2_147_483_647;
pub const STALENESS_INTERVAL_RANGE: std::ops::RangeInclusive<u32> = 5..=86_400;

/// Consistency policy of a database account.
///
/// The staleness bounds only matter for [`ConsistencyLevel::BoundedStaleness`]: reads may lag
/// writes by at most `max_staleness_prefix` operations or `max_interval_in_seconds` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyPolicy {
    pub level: ConsistencyLevel,
    pub max_staleness_prefix: u64,
    pub max_interval_in_seconds: u32,
}

impl ConsistencyPolicy {
    pub fn bounded_staleness(max_staleness_prefix: u64, max_interval_in_seconds: u32) -> Self {
        Self {
            level: ConsistencyLevel::BoundedStaleness,
            max_staleness_prefix,
            max_interval_in_seconds,
        }
    }

    pub fn eventual() -> Self {
        Self {
            level: ConsistencyLevel::Eventual,
            max_staleness_prefix: 100,
            max_interval_in_seconds: 5,
        }
    }

    /// Checks the staleness bounds against the provider limits.
    pub fn validate(&self) -> Result<(), String> {
        if self.level != ConsistencyLevel::BoundedStaleness {
            return Ok(());
        }
        if !STALENESS_PREFIX_RANGE.contains(&self.max_staleness_prefix) {
            return Err(format!(
                "max staleness prefix {} outside {:?}",
                self.max_staleness_prefix, STALENESS_PREFIX_RANGE
            ));
        }
        if !STALENESS_INTERVAL_RANGE.contains(&self.max_interval_in_seconds) {
            return Err(format!(
                "max interval {}s outside {:?}",
                self.max_interval_in_seconds, STALENESS_INTERVAL_RANGE
            ));
        }
        Ok(())
    }
}

/// API surface the account is provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    Sql,
    MongoDb,
    Table,
    Cassandra,
    Gremlin,
}

/// A subnet trusted to reach a database account over the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNetworkRule {
    pub subnet_id: ResourceId,
    /// Accept the rule even if the subnet has no `Microsoft.AzureCosmosDB` endpoint yet.
    pub ignore_missing_service_endpoint: bool,
}

impl VirtualNetworkRule {
    pub fn new(subnet_id: ResourceId) -> Self {
        Self {
            subnet_id,
            ignore_missing_service_endpoint: false,
        }
    }
}

impl Display for VirtualNetworkRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.subnet_id)
    }
}

/// A managed database account and its network access policy.
///
/// # Actor Framework
/// Implements [`ManagedResource`](resource_actors::ManagedResource). Updates replace the
/// rule list wholesale; see `database_account_actor::entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseAccount {
    pub id: ResourceId,
    pub name: String,
    pub location: Region,
    pub kind: ApiKind,
    pub consistency: ConsistencyPolicy,
    pub write_locations: Vec<Region>,
    pub virtual_network_rules: Vec<VirtualNetworkRule>,
}

impl DatabaseAccount {
    /// Network filtering is on whenever at least one subnet is trusted.
    pub fn is_virtual_network_filter_enabled(&self) -> bool {
        !self.virtual_network_rules.is_empty()
    }
}

/// Payload for creating a database account.
#[derive(Debug, Clone)]
pub struct DatabaseAccountCreate {
    pub resource_group: ResourceId,
    pub name: String,
    pub location: Region,
    pub kind: ApiKind,
    pub consistency: ConsistencyPolicy,
    pub write_locations: Vec<Region>,
    pub virtual_network_rules: Vec<VirtualNetworkRule>,
}

/// Payload for updating a database account.
///
/// `virtual_network_rules` replaces the stored list: to add a rule, send the existing rules
/// plus the new one. `Some(vec![])` removes every rule.
#[derive(Debug, Clone, Default)]
pub struct DatabaseAccountUpdate {
    pub virtual_network_rules: Option<Vec<VirtualNetworkRule>>,
    pub consistency: Option<ConsistencyPolicy>,
}
