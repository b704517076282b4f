//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (status codes, timeouts, addresses)
//! - Detect duplicate or empty layer definitions
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShortenerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{ShortenerConfig, SourceConfig, PLACEHOLDER_API_KEY};

/// Redirect codes the dispatcher may be configured with.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ShortenerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if !REDIRECT_STATUSES.contains(&config.redirect.status) {
        errors.push(ValidationError::new(
            "redirect.status",
            format!("{} is not a redirect status (expected one of {:?})", config.redirect.status, REDIRECT_STATUSES),
        ));
    }

    if !(100..=599).contains(&config.fallback.status) {
        errors.push(ValidationError::new(
            "fallback.status",
            format!("{} is not a valid HTTP status", config.fallback.status),
        ));
    }

    let mut seen = HashSet::new();
    for (i, layer) in config.layers.iter().enumerate() {
        let field = format!("layers[{i}]");
        if layer.name.trim().is_empty() {
            errors.push(ValidationError::new(format!("{field}.name"), "must not be empty"));
        } else if !seen.insert(layer.name.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.name"),
                format!("duplicate layer name '{}'", layer.name),
            ));
        }

        if layer.sources.is_empty() {
            errors.push(ValidationError::new(format!("{field}.sources"), "layer has no sources"));
        }

        for (j, source) in layer.sources.iter().enumerate() {
            if let SourceConfig::File { path, .. } = source {
                if path.as_os_str().is_empty() {
                    errors.push(ValidationError::new(format!("{field}.sources[{j}].path"), "must not be empty"));
                }
            }
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{other}' (expected pretty or json)"),
        )),
    }
    if config.observability.metrics_enabled {
        check_addr(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }

    if config.admin.enabled {
        check_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::new("admin.api_key", "must not be empty when admin is enabled"));
        } else if config.admin.api_key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::new("admin.api_key", "placeholder key must be replaced when admin is enabled"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("'{value}' is not a socket address")));
    }
}
