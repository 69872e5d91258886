//! # Configuration
//!
//! Two inputs drive a run:
//!
//! - [`Credentials`] come from the environment (`CLIENT_ID`, `CLIENT_SECRET`, `TENANT_ID`,
//!   `SUBSCRIPTION_ID`). The binary loads a `.env` file first, if there is one.
//! - [`SampleSettings`] are layered with `figment`: built-in defaults, then
//!   `cosmos-vnet-rules.toml` if present, then `SAMPLE_`-prefixed environment variables
//!   (`SAMPLE_REGION=westus2`, `SAMPLE_DELETE_DATABASE_EXPLICITLY=false`, ...).

use crate::error::SampleError;
use crate::model::{AddressPrefix, ApiKind, ConsistencyPolicy, Region};
use crate::names::random_name;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "cosmos-vnet-rules.toml";
pub const ENV_PREFIX: &str = "SAMPLE_";

/// Service principal credentials.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

impl Credentials {
    /// Reads all four variables; every missing one is named in the error.
    pub fn from_env() -> Result<Self, SampleError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SampleError> {
        let mut missing = Vec::new();
        let mut read = |key: &'static str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key);
                String::new()
            }
        };
        let credentials = Self {
            client_id: read("CLIENT_ID"),
            client_secret: read("CLIENT_SECRET"),
            tenant_id: read("TENANT_ID"),
            subscription_id: read("SUBSCRIPTION_ID"),
        };
        if !missing.is_empty() {
            return Err(SampleError::Authentication(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }
        Ok(credentials)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetSettings {
    pub name: String,
    pub address_prefix: String,
}

/// Everything about a run that is not a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSettings {
    pub resource_group_prefix: String,
    pub network_prefix: String,
    pub database_prefix: String,

    /// Fixed names instead of prefix plus random suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,

    pub region: Region,
    pub database_region: Region,
    /// Region the database account replicates writes to.
    pub write_region: Region,
    pub api_kind: ApiKind,
    pub address_space: String,
    /// The first two subnets are the ones the database account trusts.
    pub subnets: Vec<SubnetSettings>,

    pub max_staleness_prefix: u64,
    pub max_interval_in_seconds: u32,

    /// Simulated latency of every long-running operation.
    pub provisioning_delay_ms: u64,
    pub delete_database_explicitly: bool,
    pub clear_rules_before_delete: bool,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            resource_group_prefix: "CosmosDBTemplateRG".to_string(),
            network_prefix: "vnet".to_string(),
            database_prefix: "cosmosdb".to_string(),
            resource_group_name: None,
            network_name: None,
            database_name: None,
            region: Region::EastUs,
            database_region: Region::WestUs,
            write_region: Region::EastUs,
            api_kind: ApiKind::Table,
            address_space: "192.168.0.0/16".to_string(),
            subnets: vec![
                SubnetSettings {
                    name: "subnet1".to_string(),
                    address_prefix: "192.168.1.0/24".to_string(),
                },
                SubnetSettings {
                    name: "subnet2".to_string(),
                    address_prefix: "192.168.2.0/24".to_string(),
                },
            ],
            max_staleness_prefix: 100_000,
            max_interval_in_seconds: 300,
            provisioning_delay_ms: 0,
            delete_database_explicitly: true,
            clear_rules_before_delete: true,
        }
    }
}

impl SampleSettings {
    /// Defaults, then the TOML file at `path`, then `SAMPLE_*` variables.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(SampleSettings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads and validates settings from the working directory and environment.
    pub fn load() -> Result<Self, SampleError> {
        Self::load_from(SETTINGS_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SampleError> {
        let settings: SampleSettings = Self::figment(path)
            .extract()
            .map_err(|e| SampleError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings that would fail at the provider anyway.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.subnets.len() < 2 {
            return Err(SampleError::Config(format!(
                "at least two subnets are required, got {}",
                self.subnets.len()
            )));
        }
        let space: AddressPrefix = self
            .address_space
            .parse()
            .map_err(SampleError::Config)?;
        for subnet in &self.subnets {
            let prefix: AddressPrefix = subnet.address_prefix.parse().map_err(SampleError::Config)?;
            if !space.contains(&prefix) {
                return Err(SampleError::Config(format!(
                    "subnet {} ({}) is outside address space {}",
                    subnet.name, prefix, space
                )));
            }
        }
        self.consistency().validate().map_err(SampleError::Config)
    }

    pub fn consistency(&self) -> ConsistencyPolicy {
        ConsistencyPolicy::bounded_staleness(self.max_staleness_prefix, self.max_interval_in_seconds)
    }

    pub fn provisioning_delay(&self) -> Duration {
        Duration::from_millis(self.provisioning_delay_ms)
    }

    pub fn resource_group_name(&self) -> String {
        self.resource_group_name
            .clone()
            .unwrap_or_else(|| random_name(&self.resource_group_prefix))
    }

    pub fn network_name(&self) -> String {
        self.network_name
            .clone()
            .unwrap_or_else(|| random_name(&self.network_prefix))
    }

    pub fn database_name(&self) -> String {
        self.database_name
            .clone()
            .unwrap_or_else(|| random_name(&self.database_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SampleSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.consistency(), ConsistencyPolicy::bounded_staleness(100_000, 300));
        assert_eq!(settings.api_kind, ApiKind::Table);
        assert_eq!(settings.write_region, Region::EastUs);
    }

    #[test]
    fn test_file_and_env_layers_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE,
                r#"
                    region = "westus2"
                    max_interval_in_seconds = 600
                    delete_database_explicitly = false
                    api_kind = "mongodb"
                "#,
            )?;
            jail.set_env("SAMPLE_MAX_INTERVAL_IN_SECONDS", "900");
            jail.set_env("SAMPLE_DATABASE_NAME", "db1");

            let settings = SampleSettings::load().expect("settings should load");
            assert_eq!(settings.region, Region::WestUs2);
            assert_eq!(settings.max_interval_in_seconds, 900);
            assert!(!settings.delete_database_explicitly);
            assert_eq!(settings.database_name(), "db1");
            assert_eq!(settings.database_region, Region::WestUs);
            assert_eq!(settings.api_kind, ApiKind::MongoDb);
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_staleness_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("SAMPLE_MAX_STALENESS_PREFIX", "1");
            assert!(matches!(SampleSettings::load(), Err(SampleError::Config(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_credentials_are_named() {
        let result = Credentials::from_lookup(|key| (key == "CLIENT_ID").then(|| "id".to_string()));
        match result {
            Err(SampleError::Authentication(msg)) => {
                assert!(msg.contains("CLIENT_SECRET"));
                assert!(msg.contains("SUBSCRIPTION_ID"));
                assert!(!msg.contains("CLIENT_ID,"));
            }
            other => panic!("expected authentication error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_secret_is_redacted() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
            tenant_id: "tenant".to_string(),
            subscription_id: "sub".to_string(),
        };
        assert!(!format!("{:?}", credentials).contains("hunter2"));
    }
}
