//! [`ManagedResource`] implementation for [`VirtualNetwork`].
//!
//! Creation and subnet updates enforce:
//! - the address space and every subnet prefix are valid CIDR blocks
//! - every subnet lies inside the address space
//! - subnet names are unique (case-insensitively) and subnets do not overlap

use super::actions::{NetworkAction, NetworkActionResult};
use super::error::NetworkError;
use crate::model::{
    AddressPrefix, ResourceId, Subnet, SubnetSpec, VirtualNetwork, VirtualNetworkCreate,
    VirtualNetworkUpdate,
};
use async_trait::async_trait;
use resource_actors::ManagedResource;

const NAMESPACE: &str = "Microsoft.Network";
const RESOURCE_TYPE: &str = "virtualNetworks";

fn build_subnets(
    network_id: &ResourceId,
    address_space: &AddressPrefix,
    specs: Vec<SubnetSpec>,
) -> Result<Vec<Subnet>, NetworkError> {
    let mut subnets: Vec<Subnet> = Vec::with_capacity(specs.len());
    for spec in specs {
        if spec.name.is_empty() {
            return Err(NetworkError::ValidationError("subnet name is empty".into()));
        }
        let prefix: AddressPrefix = spec
            .address_prefix
            .parse()
            .map_err(NetworkError::ValidationError)?;
        if !address_space.contains(&prefix) {
            return Err(NetworkError::ValidationError(format!(
                "subnet {} ({}) is outside address space {}",
                spec.name, prefix, address_space
            )));
        }
        if let Some(existing) = subnets.iter().find(|s| s.name.eq_ignore_ascii_case(&spec.name)) {
            return Err(NetworkError::ValidationError(format!(
                "duplicate subnet name {}",
                existing.name
            )));
        }
        if let Some(existing) = subnets.iter().find(|s| s.address_prefix.overlaps(&prefix)) {
            return Err(NetworkError::ValidationError(format!(
                "subnet {} ({}) overlaps {} ({})",
                spec.name, prefix, existing.name, existing.address_prefix
            )));
        }
        subnets.push(Subnet {
            id: network_id.child("subnets", &spec.name),
            name: spec.name,
            address_prefix: prefix,
            service_endpoints: spec.service_endpoints,
        });
    }
    Ok(subnets)
}

#[async_trait]
impl ManagedResource for VirtualNetwork {
    type Id = ResourceId;
    type Create = VirtualNetworkCreate;
    type Update = VirtualNetworkUpdate;
    type Action = NetworkAction;
    type ActionResult = NetworkActionResult;
    type Context = ();
    type Error = NetworkError;

    fn id_for(params: &VirtualNetworkCreate) -> ResourceId {
        params
            .resource_group
            .provider(NAMESPACE, RESOURCE_TYPE, &params.name)
    }

    fn from_create_params(id: ResourceId, params: VirtualNetworkCreate) -> Result<Self, NetworkError> {
        if params.name.is_empty() || params.name.len() > 64 {
            return Err(NetworkError::ValidationError(format!(
                "network name '{}' must be 1-64 characters",
                params.name
            )));
        }
        let address_space: AddressPrefix = params
            .address_space
            .parse()
            .map_err(NetworkError::ValidationError)?;
        let subnets = build_subnets(&id, &address_space, params.subnets)?;
        Ok(Self {
            id,
            name: params.name,
            location: params.location,
            address_space,
            subnets,
        })
    }

    async fn on_update(&mut self, update: VirtualNetworkUpdate, _ctx: &()) -> Result<(), NetworkError> {
        if let Some(specs) = update.subnets {
            self.subnets = build_subnets(&self.id, &self.address_space, specs)?;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: NetworkAction,
        _ctx: &(),
    ) -> Result<NetworkActionResult, NetworkError> {
        match action {
            NetworkAction::Subnet(name) => Ok(NetworkActionResult::Subnet(self.subnet(&name).cloned())),
        }
    }
}
