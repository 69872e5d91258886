//! [`ManagedResource`] implementation for [`DatabaseAccount`].
//!
//! Every virtual network rule is checked against the network actor, on create and again on
//! each update: the subnet must exist and, unless the rule opts out, expose the
//! `Microsoft.AzureCosmosDB` service endpoint.

use super::actions::{DatabaseAccountAction, DatabaseAccountActionResult};
use super::error::DatabaseAccountError;
use crate::clients::NetworkClient;
use crate::network_actor::NetworkError;
use crate::model::{
    DatabaseAccount, DatabaseAccountCreate, DatabaseAccountUpdate, ResourceId, ServiceEndpoint,
    VirtualNetworkRule,
};
use async_trait::async_trait;
use resource_actors::ManagedResource;
use std::collections::HashSet;
use tracing::debug;

const NAMESPACE: &str = "Microsoft.DocumentDB";
const RESOURCE_TYPE: &str = "databaseAccounts";

/// Account names become DNS labels: 3-44 characters of lowercase letters, digits and hyphens.
fn validate_name(name: &str) -> Result<(), DatabaseAccountError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !(3..=44).contains(&name.len()) || !valid_chars || name.starts_with('-') {
        return Err(DatabaseAccountError::ValidationError(format!(
            "account name '{}' must be 3-44 lowercase letters, digits or hyphens",
            name
        )));
    }
    Ok(())
}

async fn validate_rules(
    rules: &[VirtualNetworkRule],
    networks: &NetworkClient,
) -> Result<(), DatabaseAccountError> {
    let mut seen = HashSet::new();
    for rule in rules {
        let invalid = |reason: &str| DatabaseAccountError::InvalidRule {
            rule: rule.to_string(),
            reason: reason.to_string(),
        };
        if !seen.insert(rule.subnet_id.as_str().to_ascii_lowercase()) {
            return Err(invalid("duplicate rule"));
        }
        let network_id = rule
            .subnet_id
            .parent()
            .ok_or_else(|| invalid("not a subnet identifier"))?;
        let subnet = networks
            .subnet(network_id, rule.subnet_id.name())
            .await
            .map_err(|e| match e {
                NetworkError::NotFound(_) => invalid("virtual network does not exist"),
                other => DatabaseAccountError::Network(other),
            })?
            .ok_or_else(|| invalid("subnet does not exist"))?;
        if !rule.ignore_missing_service_endpoint && !subnet.allows(ServiceEndpoint::CosmosDb) {
            return Err(invalid("subnet has no Microsoft.AzureCosmosDB service endpoint"));
        }
        debug!(subnet = %subnet.id, "Virtual network rule accepted");
    }
    Ok(())
}

#[async_trait]
impl ManagedResource for DatabaseAccount {
    type Id = ResourceId;
    type Create = DatabaseAccountCreate;
    type Update = DatabaseAccountUpdate;
    type Action = DatabaseAccountAction;
    type ActionResult = DatabaseAccountActionResult;
    type Context = NetworkClient;
    type Error = DatabaseAccountError;

    fn id_for(params: &DatabaseAccountCreate) -> ResourceId {
        params
            .resource_group
            .provider(NAMESPACE, RESOURCE_TYPE, &params.name)
    }

    fn from_create_params(
        id: ResourceId,
        params: DatabaseAccountCreate,
    ) -> Result<Self, DatabaseAccountError> {
        validate_name(&params.name)?;
        params
            .consistency
            .validate()
            .map_err(DatabaseAccountError::ValidationError)?;
        let write_locations = if params.write_locations.is_empty() {
            vec![params.location]
        } else {
            params.write_locations
        };
        Ok(Self {
            id,
            name: params.name,
            location: params.location,
            kind: params.kind,
            consistency: params.consistency,
            write_locations,
            virtual_network_rules: params.virtual_network_rules,
        })
    }

    async fn on_create(&mut self, networks: &NetworkClient) -> Result<(), DatabaseAccountError> {
        validate_rules(&self.virtual_network_rules, networks).await
    }

    async fn on_update(
        &mut self,
        update: DatabaseAccountUpdate,
        networks: &NetworkClient,
    ) -> Result<(), DatabaseAccountError> {
        if let Some(consistency) = update.consistency {
            consistency
                .validate()
                .map_err(DatabaseAccountError::ValidationError)?;
            self.consistency = consistency;
        }
        if let Some(rules) = update.virtual_network_rules {
            validate_rules(&rules, networks).await?;
            self.virtual_network_rules = rules;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: DatabaseAccountAction,
        _networks: &NetworkClient,
    ) -> Result<DatabaseAccountActionResult, DatabaseAccountError> {
        match action {
            DatabaseAccountAction::ListVirtualNetworkRules => Ok(
                DatabaseAccountActionResult::VirtualNetworkRules(self.virtual_network_rules.clone()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiKind, ConsistencyPolicy, Region};

    fn create(name: &str) -> DatabaseAccountCreate {
        DatabaseAccountCreate {
            resource_group: ResourceId::subscription("sub").resource_group("rg"),
            name: name.to_string(),
            location: Region::WestUs,
            kind: ApiKind::Sql,
            consistency: ConsistencyPolicy::bounded_staleness(100_000, 300),
            write_locations: vec![],
            virtual_network_rules: vec![],
        }
    }

    #[test]
    fn test_write_location_defaults_to_account_location() {
        let params = create("db1");
        let id = DatabaseAccount::id_for(&params);
        let account = DatabaseAccount::from_create_params(id.clone(), params).unwrap();
        assert_eq!(account.write_locations, vec![Region::WestUs]);
        assert_eq!(id.name(), "db1");
        assert!(!account.is_virtual_network_filter_enabled());
    }

    #[test]
    fn test_name_rules() {
        for bad in ["DB1", "db", "-db1", "db_1"] {
            let params = create(bad);
            let id = DatabaseAccount::id_for(&params);
            assert!(
                DatabaseAccount::from_create_params(id, params).is_err(),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_invalid_consistency_is_rejected() {
        let mut params = create("db1");
        params.consistency = ConsistencyPolicy::bounded_staleness(1, 300);
        let id = DatabaseAccount::id_for(&params);
        assert!(matches!(
            DatabaseAccount::from_create_params(id, params),
            Err(DatabaseAccountError::ValidationError(_))
        ));
    }
}
