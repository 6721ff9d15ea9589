use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};

/// Deployment tiers of the submission portal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Development (hub-dev2)
    Dev2,
    /// Staging (hub-stage)
    Stage,
    /// Production (hub)
    Prod,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Dev2, Tier::Stage, Tier::Prod];

    /// Key used for this tier in config files.
    pub fn key(self) -> &'static str {
        match self {
            Tier::Dev2 => "dev2",
            Tier::Stage => "stage",
            Tier::Prod => "prod",
        }
    }

    /// Default GraphQL endpoint for this tier.
    pub fn default_url(self) -> &'static str {
        match self {
            Tier::Dev2 => "https://hub-dev2.datacommons.cancer.gov/api/graphql",
            Tier::Stage => "https://hub-stage.datacommons.cancer.gov/api/graphql",
            Tier::Prod => "https://hub.datacommons.cancer.gov/api/graphql",
        }
    }

    /// Default environment variable holding this tier's bearer token.
    pub fn default_token_env(self) -> &'static str {
        match self {
            Tier::Dev2 => "DEV2API",
            Tier::Stage => "STAGEAPI",
            Tier::Prod => "PRODAPI",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Tier {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(HubError::NoTier);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "dev2" => Ok(Tier::Dev2),
            "stage" => Ok(Tier::Stage),
            "prod" | "production" => Ok(Tier::Prod),
            _ => Err(HubError::UnknownTier(trimmed.to_string())),
        }
    }
}
