//! [`ManagedResource`] implementation for [`ResourceGroup`].
//!
//! # Cascade Delete
//! Deleting a group deletes its contents first: database accounts, then virtual networks
//! (an account rule may still point into a network). If any contained resource cannot be
//! deleted, `on_delete` fails and the group itself stays.

use super::actions::{ResourceGroupAction, ResourceGroupActionResult};
use super::error::ResourceGroupError;
use crate::clients::{DatabaseAccountClient, NetworkClient};
use crate::model::{ResourceGroup, ResourceGroupCreate, ResourceGroupUpdate, ResourceId};
use async_trait::async_trait;
use resource_actors::{ActorClient, ManagedResource};
use tracing::info;

/// Clients of the resource kinds a group contains.
#[derive(Clone)]
pub struct GroupContext {
    pub networks: NetworkClient,
    pub accounts: DatabaseAccountClient,
}

impl GroupContext {
    /// Identifiers of the accounts and networks inside `group`.
    async fn contents(
        &self,
        group: &ResourceId,
    ) -> Result<(Vec<ResourceId>, Vec<ResourceId>), ResourceGroupError> {
        let accounts = self
            .accounts
            .list()
            .await
            .map_err(|e| ResourceGroupError::ActorCommunicationError(e.to_string()))?
            .into_iter()
            .filter(|a| a.id.is_within(group))
            .map(|a| a.id)
            .collect();
        let networks = self
            .networks
            .list()
            .await
            .map_err(|e| ResourceGroupError::ActorCommunicationError(e.to_string()))?
            .into_iter()
            .filter(|n| n.id.is_within(group))
            .map(|n| n.id)
            .collect();
        Ok((accounts, networks))
    }
}

fn validate_name(name: &str) -> Result<(), ResourceGroupError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'));
    if name.is_empty() || name.len() > 90 || !valid_chars || name.ends_with('.') {
        return Err(ResourceGroupError::ValidationError(format!(
            "invalid resource group name '{}'",
            name
        )));
    }
    Ok(())
}

#[async_trait]
impl ManagedResource for ResourceGroup {
    type Id = ResourceId;
    type Create = ResourceGroupCreate;
    type Update = ResourceGroupUpdate;
    type Action = ResourceGroupAction;
    type ActionResult = ResourceGroupActionResult;
    type Context = GroupContext;
    type Error = ResourceGroupError;

    fn id_for(params: &ResourceGroupCreate) -> ResourceId {
        ResourceId::subscription(&params.subscription_id).resource_group(&params.name)
    }

    fn from_create_params(id: ResourceId, params: ResourceGroupCreate) -> Result<Self, ResourceGroupError> {
        validate_name(&params.name)?;
        Ok(Self {
            id,
            name: params.name,
            location: params.location,
            tags: params.tags,
        })
    }

    async fn on_update(&mut self, update: ResourceGroupUpdate, _ctx: &GroupContext) -> Result<(), ResourceGroupError> {
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        Ok(())
    }

    async fn on_delete(&self, ctx: &GroupContext) -> Result<(), ResourceGroupError> {
        let (accounts, networks) = ctx.contents(&self.id).await?;
        info!(
            resource_group = %self.id,
            accounts = accounts.len(),
            networks = networks.len(),
            "Deleting resource group contents"
        );

        for id in accounts {
            ctx.accounts.delete(id.clone()).await.map_err(|e| ResourceGroupError::CascadeFailed {
                resource: id.to_string(),
                reason: e.to_string(),
            })?;
        }
        for id in networks {
            ctx.networks.delete(id.clone()).await.map_err(|e| ResourceGroupError::CascadeFailed {
                resource: id.to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ResourceGroupAction,
        ctx: &GroupContext,
    ) -> Result<ResourceGroupActionResult, ResourceGroupError> {
        match action {
            ResourceGroupAction::ListResources => {
                let (mut accounts, networks) = ctx.contents(&self.id).await?;
                accounts.extend(networks);
                Ok(ResourceGroupActionResult::Resources(accounts))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;

    #[test]
    fn test_id_is_derived_from_subscription_and_name() {
        let params = ResourceGroupCreate::new("sub-1", "CosmosDBTemplateRGab12cd34", Region::EastUs);
        assert_eq!(
            ResourceGroup::id_for(&params).as_str(),
            "/subscriptions/sub-1/resourceGroups/CosmosDBTemplateRGab12cd34"
        );
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        for bad in ["", "trailing.", "has space", "slash/name"] {
            let params = ResourceGroupCreate::new("sub-1", bad, Region::EastUs);
            let id = ResourceGroup::id_for(&params);
            assert!(ResourceGroup::from_create_params(id, params).is_err(), "{:?}", bad);
        }
    }
}
