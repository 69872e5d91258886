use crate::model::{Region, ResourceId};
use std::collections::BTreeMap;

/// A named container for every resource created by one run.
///
/// # Actor Framework
/// Implements [`ManagedResource`](resource_actors::ManagedResource); deleting a group
/// deletes everything inside it (see `resource_group_actor::entity`).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub id: ResourceId,
    pub name: String,
    pub location: Region,
    pub tags: BTreeMap<String, String>,
}

/// Payload for creating a resource group.
#[derive(Debug, Clone)]
pub struct ResourceGroupCreate {
    pub subscription_id: String,
    pub name: String,
    pub location: Region,
    pub tags: BTreeMap<String, String>,
}

impl ResourceGroupCreate {
    pub fn new(subscription_id: impl Into<String>, name: impl Into<String>, location: Region) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            name: name.into(),
            location,
            tags: BTreeMap::new(),
        }
    }
}

/// Payload for updating a resource group. Tags are replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct ResourceGroupUpdate {
    pub tags: Option<BTreeMap<String, String>>,
}
