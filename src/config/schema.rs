//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::{Format, RedirectRecord};

/// Root configuration for the shortener.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShortenerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Redirect response settings.
    pub redirect: RedirectConfig,

    /// Response for paths no layer resolves.
    pub fallback: FallbackConfig,

    /// Resolver layers, in registration order (the last one is checked first).
    pub layers: Vec<LayerConfig>,

    /// Initial contents of the key-value store.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Redirect response settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Status code used for every redirect, whichever layer resolved it.
    pub status: u16,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self { status: 308 }
    }
}

/// Terminal response for chain-wide misses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub status: u16,
    pub body: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            status: 404,
            body: "Not Found\n".to_string(),
        }
    }
}

/// One named resolver layer, folded from its sources in order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayerConfig {
    /// Layer identifier for logging/metrics.
    pub name: String,

    /// Record sources; later sources overwrite earlier ones for the same path.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Where a layer's records come from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Records written directly in the config file.
    Inline {
        #[serde(default)]
        entries: Vec<RedirectRecord>,
    },

    /// A mapping file on disk.
    File {
        path: PathBuf,

        /// Declared format; probed when absent.
        #[serde(default)]
        format: Option<Format>,

        /// When false, a missing file is skipped with a warning.
        #[serde(default = "default_required")]
        required: bool,
    },

    /// Snapshot of the in-process key-value store.
    Store,
}

fn default_required() -> bool {
    true
}

impl SourceConfig {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            SourceConfig::Inline { entries } => format!("inline ({} entries)", entries.len()),
            SourceConfig::File { path, .. } => format!("file {}", path.display()),
            SourceConfig::Store => "store".to_string(),
        }
    }
}

/// Key-value store settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Records loaded into the store at startup.
    pub seed: Vec<RedirectRecord>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Default `admin.api_key`. Validation refuses it when admin is enabled.
pub const PLACEHOLDER_API_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_API_KEY.to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
