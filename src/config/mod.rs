//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShortenerConfig (validated, immutable)
//!     → lifecycle::startup compiles the redirect chain from `layers`
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server recompiles the chain and swaps it in
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ShortenerConfig;
pub use schema::{AdminConfig, FallbackConfig, LayerConfig, ListenerConfig, ObservabilityConfig, SourceConfig};
pub use watcher::ConfigWatcher;
