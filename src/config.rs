use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HubError, Result};
use crate::tier::Tier;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub default_tier: Option<Tier>,
    /// Request timeout in seconds; unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
    pub tiers: BTreeMap<String, TierConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TierConfig {
    pub url: String,
    pub token_env: String,
}

/// A tier resolved to a URL and credential, ready for requests.
#[derive(Clone)]
pub struct Endpoint {
    pub tier: Tier,
    pub url: String,
    token: String,
}

impl Endpoint {
    pub fn new(tier: Tier, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            tier,
            url: url.into(),
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("tier", &self.tier)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let tiers = Tier::ALL
            .iter()
            .map(|tier| {
                (
                    tier.key().to_string(),
                    TierConfig {
                        url: tier.default_url().to_string(),
                        token_env: tier.default_token_env().to_string(),
                    },
                )
            })
            .collect();

        Self {
            default_tier: None,
            timeout_secs: None,
            tiers,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| HubError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        Self::from_toml(&contents).map_err(|e| HubError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    /// Parse TOML, filling in any tier the file does not mention.
    pub fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(contents)?;
        for (key, tier_config) in Config::default().tiers {
            config.tiers.entry(key).or_insert(tier_config);
        }
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "datahub")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(HubError::NoConfigDir)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Get tier, preferring explicit argument over default
    pub fn resolve_tier(&self, explicit: Option<&str>) -> Result<Tier> {
        match explicit {
            Some(name) => name.parse(),
            None => self.default_tier.ok_or(HubError::NoTier),
        }
    }

    /// Resolve a tier to its endpoint, reading the token through `lookup`.
    pub fn endpoint<F>(&self, tier: Tier, lookup: F) -> Result<Endpoint>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tier_config = self
            .tiers
            .get(tier.key())
            .ok_or_else(|| HubError::TierNotConfigured(tier.key().to_string()))?;

        Url::parse(&tier_config.url).map_err(|_| HubError::InvalidUrl(tier_config.url.clone()))?;

        let token = lookup(&tier_config.token_env)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| HubError::MissingToken {
                tier: tier.key().to_string(),
                var: tier_config.token_env.clone(),
            })?;

        Ok(Endpoint::new(tier, tier_config.url.clone(), token))
    }

    pub fn endpoint_from_env(&self, tier: Tier) -> Result<Endpoint> {
        self.endpoint(tier, |var| std::env::var(var).ok())
    }
}
