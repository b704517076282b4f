//! Mapping sources.
//!
//! # Data Flow
//! ```text
//! raw bytes + Format
//!     → yaml.rs / json.rs / rows.rs (format-specific parse)
//!     → Vec<RedirectRecord> (source order preserved)
//!
//! raw bytes, no declared format
//!     → probe.rs (ordered attempts, each isolated)
//!     → Vec<RedirectRecord> or one aggregated ParseError
//!
//! RedirectStore (in-process key-value source)
//!     → records() snapshot, sorted by path
//! ```
//!
//! # Design Decisions
//! - Parsing is all-or-nothing: a malformed blob never yields partial records
//! - Format is chosen by the caller; probing is an explicit opt-in
//! - Destinations are opaque strings, never validated as URLs

pub mod json;
pub mod probe;
pub mod rows;
pub mod store;
pub mod yaml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use probe::{parse_any, DEFAULT_PROBE_ORDER};
pub use store::RedirectStore;

/// One declared `path → destination` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RedirectRecord {
    /// Request path, compared verbatim.
    pub path: String,

    /// Redirect target. Serialized as `url`.
    #[serde(rename = "url", alias = "destination")]
    pub destination: String,
}

impl RedirectRecord {
    pub fn new(path: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            destination: destination.into(),
        }
    }
}

/// Serialization formats a mapping blob can be declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Yaml,
    Json,
    TableRows,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::TableRows => "table-rows",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "table-rows" | "rows" => Ok(Format::TableRows),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown mapping format '{0}' (expected yaml, json or table-rows)")]
pub struct UnknownFormat(pub String);

/// A blob did not conform to its declared format.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {reason}")]
    Row { line: usize, reason: String },

    #[error("no recognized format matched: {}", describe_attempts(.attempts))]
    NoFormatMatched { attempts: Vec<(Format, ParseError)> },
}

fn describe_attempts(attempts: &[(Format, ParseError)]) -> String {
    let parts: Vec<String> = attempts
        .iter()
        .map(|(format, err)| format!("{format}: {err}"))
        .collect();
    parts.join("; ")
}

/// Parse `bytes` as the declared `format`.
pub fn parse(bytes: &[u8], format: Format) -> Result<Vec<RedirectRecord>, ParseError> {
    match format {
        Format::Yaml => yaml::parse(bytes),
        Format::Json => json::parse(bytes),
        Format::TableRows => rows::parse(bytes),
    }
}
