use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("No tier specified. Use --tier, DHUB_TIER, or default_tier in config.toml")]
    NoTier,

    #[error("Unknown tier '{0}'. Expected one of: dev2, stage, prod")]
    UnknownTier(String),

    #[error("Tier '{0}' has no entry in the configuration")]
    TierNotConfigured(String),

    #[error("No API token for tier {tier}. Set the {var} environment variable")]
    MissingToken { tier: String, var: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse diff config at {path}: {source}")]
    DiffConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File upload failed (status {status}): {message}")]
    UploadFailed { status: u16, message: String },
}

impl HubError {
    /// True for errors raised before any request was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HubError::NoTier
                | HubError::UnknownTier(_)
                | HubError::TierNotConfigured(_)
                | HubError::MissingToken { .. }
                | HubError::ConfigRead { .. }
                | HubError::ConfigParse { .. }
                | HubError::NoConfigDir
                | HubError::InvalidUrl(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
