use crate::model::{Region, ResourceId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 CIDR block such as `192.168.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressPrefix {
    network: Ipv4Addr,
    len: u8,
}

impl AddressPrefix {
    fn mask(&self) -> u32 {
        if self.len == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(self.len))
        }
    }

    fn range(&self) -> (u32, u32) {
        let start = u32::from(self.network) & self.mask();
        (start, start | !self.mask())
    }

    /// True when every address of `other` is also in `self`.
    pub fn contains(&self, other: &AddressPrefix) -> bool {
        let (start, end) = self.range();
        let (other_start, other_end) = other.range();
        start <= other_start && other_end <= end
    }

    pub fn overlaps(&self, other: &AddressPrefix) -> bool {
        let (start, end) = self.range();
        let (other_start, other_end) = other.range();
        start <= other_end && other_start <= end
    }
}

impl FromStr for AddressPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| format!("'{}' is not in CIDR notation", s))?;
        let network: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("'{}' is not an IPv4 address", addr))?;
        let len: u8 = len
            .parse()
            .map_err(|_| format!("'{}' is not a prefix length", len))?;
        if len > 32 {
            return Err(format!("prefix length {} exceeds 32", len));
        }
        Ok(Self { network, len })
    }
}

impl Display for AddressPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.len)
    }
}

/// A platform service a subnet lets through its service endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceEndpoint {
    CosmosDb,
    Storage,
    Sql,
}

impl ServiceEndpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceEndpoint::CosmosDb => "Microsoft.AzureCosmosDB",
            ServiceEndpoint::Storage => "Microsoft.Storage",
            ServiceEndpoint::Sql => "Microsoft.Sql",
        }
    }
}

impl Display for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subnet of a [`VirtualNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subnet {
    pub id: ResourceId,
    pub name: String,
    pub address_prefix: AddressPrefix,
    pub service_endpoints: Vec<ServiceEndpoint>,
}

impl Subnet {
    pub fn allows(&self, service: ServiceEndpoint) -> bool {
        self.service_endpoints.contains(&service)
    }
}

/// A virtual network and its subnets.
///
/// # Actor Framework
/// Implements [`ManagedResource`](resource_actors::ManagedResource); see
/// `network_actor::entity` for the address validation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualNetwork {
    pub id: ResourceId,
    pub name: String,
    pub location: Region,
    pub address_space: AddressPrefix,
    pub subnets: Vec<Subnet>,
}

impl VirtualNetwork {
    pub fn subnet(&self, name: &str) -> Option<&Subnet> {
        self.subnets.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

/// Definition of a subnet inside a create or update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetSpec {
    pub name: String,
    pub address_prefix: String,
    #[serde(default)]
    pub service_endpoints: Vec<ServiceEndpoint>,
}

impl SubnetSpec {
    pub fn new(name: impl Into<String>, address_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_prefix: address_prefix.into(),
            service_endpoints: Vec::new(),
        }
    }

    pub fn with_access_from(mut self, service: ServiceEndpoint) -> Self {
        if !self.service_endpoints.contains(&service) {
            self.service_endpoints.push(service);
        }
        self
    }
}

/// Payload for creating a virtual network.
#[derive(Debug, Clone)]
pub struct VirtualNetworkCreate {
    pub resource_group: ResourceId,
    pub name: String,
    pub location: Region,
    pub address_space: String,
    pub subnets: Vec<SubnetSpec>,
}

/// Payload for updating a virtual network. Subnets are replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct VirtualNetworkUpdate {
    pub subnets: Option<Vec<SubnetSpec>>,
}
