use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Provider location a resource is deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    EastUs,
    EastUs2,
    WestUs,
    WestUs2,
    NorthEurope,
    WestEurope,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::EastUs => "eastus",
            Region::EastUs2 => "eastus2",
            Region::WestUs => "westus",
            Region::WestUs2 => "westus2",
            Region::NorthEurope => "northeurope",
            Region::WestEurope => "westeurope",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace(' ', "").to_ascii_lowercase();
        [
            Region::EastUs,
            Region::EastUs2,
            Region::WestUs,
            Region::WestUs2,
            Region::NorthEurope,
            Region::WestEurope,
        ]
        .into_iter()
        .find(|r| r.as_str() == wanted)
        .ok_or_else(|| format!("unknown region '{}'", s))
    }
}
