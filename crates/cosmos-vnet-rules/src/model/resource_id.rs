//! Hierarchical resource identifiers.
//!
//! Every resource is addressed by its path below the subscription:
//!
//! ```text
//! /subscriptions/{sub}/resourceGroups/{rg}/providers/{namespace}/{type}/{name}[/{child_type}/{child}]
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Fully qualified identifier of a subscription, resource group or resource.
///
/// Identity ignores ASCII case: `RG1` and `rg1` address the same group. The original
/// spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceId(String);

/// Why a string is not a valid [`ResourceId`].
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid resource id '{id}': {reason}")]
pub struct ResourceIdError {
    pub id: String,
    pub reason: &'static str,
}

impl ResourceId {
    /// `/subscriptions/{subscription_id}`
    pub fn subscription(subscription_id: &str) -> Self {
        Self(format!("/subscriptions/{}", subscription_id))
    }

    /// Appends `/resourceGroups/{name}`.
    pub fn resource_group(&self, name: &str) -> Self {
        Self(format!("{}/resourceGroups/{}", self.0, name))
    }

    /// Appends `/providers/{namespace}/{resource_type}/{name}`.
    pub fn provider(&self, namespace: &str, resource_type: &str, name: &str) -> Self {
        Self(format!(
            "{}/providers/{}/{}/{}",
            self.0, namespace, resource_type, name
        ))
    }

    /// Appends `/{child_type}/{name}` for nested resources such as subnets.
    pub fn child(&self, child_type: &str, name: &str) -> Self {
        Self(format!("{}/{}/{}", self.0, child_type, name))
    }

    fn segments(&self) -> Vec<&str> {
        self.0.trim_start_matches('/').split('/').collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment: the name of the addressed resource.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    pub fn subscription_id(&self) -> &str {
        self.segments().get(1).copied().unwrap_or_default()
    }

    pub fn resource_group_name(&self) -> Option<&str> {
        let segments = self.segments();
        segments
            .iter()
            .position(|s| s.eq_ignore_ascii_case("resourceGroups"))
            .and_then(|i| segments.get(i + 1).copied())
    }

    /// Identifier of the enclosing resource group, if this id lives below one.
    pub fn resource_group_id(&self) -> Option<ResourceId> {
        self.resource_group_name()
            .map(|rg| ResourceId::subscription(self.subscription_id()).resource_group(rg))
    }

    /// The identifier one level up, e.g. the virtual network of a subnet.
    pub fn parent(&self) -> Option<ResourceId> {
        let segments = self.segments();
        let len = segments.len();
        if len <= 2 {
            return None;
        }
        let drop = if len >= 4 && segments[len - 4].eq_ignore_ascii_case("providers") {
            4
        } else {
            2
        };
        Some(Self(format!("/{}", segments[..len - drop].join("/"))))
    }

    /// True when `self` is `scope` or addressed below it. Comparison ignores case,
    /// matching how the provider treats identifiers.
    pub fn is_within(&self, scope: &ResourceId) -> bool {
        let me = self.0.to_ascii_lowercase();
        let scope = scope.0.to_ascii_lowercase();
        me == scope || me.starts_with(&format!("{}/", scope))
    }
}

impl ResourceId {
    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for ResourceId {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ResourceId {}

impl Hash for ResourceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl Ord for ResourceId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for ResourceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| ResourceIdError {
            id: s.to_string(),
            reason,
        };
        let Some(rest) = s.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(invalid("contains an empty segment"));
        }
        if segments.len() % 2 != 0 {
            return Err(invalid("dangling segment"));
        }
        if !segments[0].eq_ignore_ascii_case("subscriptions") {
            return Err(invalid("must start with /subscriptions"));
        }
        Ok(Self(s.to_string()))
    }
}
