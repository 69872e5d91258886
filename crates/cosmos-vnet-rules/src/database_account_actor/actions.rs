//! Custom actions for the database account actor.

use crate::model::VirtualNetworkRule;

#[derive(Debug, Clone)]
pub enum DatabaseAccountAction {
    /// Reads the current virtual network rules.
    ListVirtualNetworkRules,
}

#[derive(Debug, Clone)]
pub enum DatabaseAccountActionResult {
    VirtualNetworkRules(Vec<VirtualNetworkRule>),
}
