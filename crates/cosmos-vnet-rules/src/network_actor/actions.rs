//! Custom actions for the virtual network actor.

use crate::model::Subnet;

/// Read-only lookups on a virtual network beyond a plain `get`.
#[derive(Debug, Clone)]
pub enum NetworkAction {
    /// Looks up one subnet by name.
    Subnet(String),
}

/// Results from [`NetworkAction`]s - variants match 1:1.
#[derive(Debug, Clone)]
pub enum NetworkActionResult {
    Subnet(Option<Subnet>),
}
