//! Custom actions for the resource group actor.

use crate::model::ResourceId;

#[derive(Debug, Clone)]
pub enum ResourceGroupAction {
    /// Lists the identifiers of every resource inside the group.
    ListResources,
}

#[derive(Debug, Clone)]
pub enum ResourceGroupActionResult {
    Resources(Vec<ResourceId>),
}
