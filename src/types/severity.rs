use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Severity filter accepted by the QC result queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Severity {
    /// Errors and warnings
    #[default]
    All,
    /// Errors only
    Error,
    /// Warnings only
    Warning,
}

impl Severity {
    /// Value sent to the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::All => "All",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }

    /// Child arrays of a QC result holding issues of this severity.
    pub fn child_keys(self) -> &'static [&'static str] {
        match self {
            Severity::All => &["errors", "warnings"],
            Severity::Error => &["errors"],
            Severity::Warning => &["warnings"],
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
