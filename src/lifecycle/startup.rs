//! Startup orchestration: compiling configured layers into a chain.
//!
//! # Responsibilities
//! - Read each layer's sources in order (inline, file, store)
//! - Fold them into one table per layer
//! - Wrap layers outer-to-inner around the terminal
//!
//! # Design Decisions
//! - Fail fast: a read or parse error aborts compilation; the caller
//!   decides whether that aborts startup or keeps the previous chain
//! - Only an optional (`required = false`) file may be missing, and
//!   skipping it is logged

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{LayerConfig, SourceConfig};
use crate::observability::metrics;
use crate::redirect::{ChainBuilder, FallbackChain, Resolver, TableBuilder};
use crate::source::{self, ParseError, RedirectRecord, RedirectStore, DEFAULT_PROBE_ORDER};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("layer '{layer}': failed to read {}: {source}", path.display())]
    Read {
        layer: String,
        path: PathBuf,
        source: io::Error,
    },

    #[error("layer '{layer}': failed to parse {}: {source}", path.display())]
    Parse {
        layer: String,
        path: PathBuf,
        source: ParseError,
    },

    /// The blocking compile task panicked or was cancelled.
    #[error("chain compilation did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Compile `layers` (registration order) into a chain ending in `terminal`.
pub fn compile_chain<T>(
    layers: &[LayerConfig],
    store: &RedirectStore,
    terminal: T,
) -> Result<FallbackChain<T>, StartupError> {
    let mut builder = ChainBuilder::new(terminal);
    for layer in layers {
        builder = builder.wrap(compile_layer(layer, store)?);
    }

    let chain = builder.build();
    for info in chain.layers() {
        metrics::record_layer_entries(&info.name, info.entries);
    }
    tracing::info!(
        layers = chain.len(),
        entries = chain.total_entries(),
        "Redirect chain compiled"
    );
    Ok(chain)
}

/// Fold one layer's sources, in order, into a resolver.
pub fn compile_layer(layer: &LayerConfig, store: &RedirectStore) -> Result<Resolver, StartupError> {
    let mut builder = TableBuilder::new();
    for source in &layer.sources {
        let records = load_source(&layer.name, source, store)?;
        tracing::debug!(
            layer = %layer.name,
            source = %source.describe(),
            records = records.len(),
            "Source loaded"
        );
        builder = builder.extend(records);
    }

    if builder.overwritten() > 0 {
        tracing::debug!(layer = %layer.name, overwritten = builder.overwritten(), "Duplicate paths resolved by last write");
    }

    Ok(Resolver::new(layer.name.clone(), builder.build()))
}

fn load_source(
    layer: &str,
    source: &SourceConfig,
    store: &RedirectStore,
) -> Result<Vec<RedirectRecord>, StartupError> {
    match source {
        SourceConfig::Inline { entries } => Ok(entries.clone()),
        SourceConfig::Store => Ok(store.records()),
        SourceConfig::File { path, format, required } => {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                    tracing::warn!(layer = %layer, path = %path.display(), "Optional mapping file missing, skipping");
                    return Ok(Vec::new());
                }
                Err(e) => {
                    return Err(StartupError::Read {
                        layer: layer.to_string(),
                        path: path.clone(),
                        source: e,
                    })
                }
            };
            parse_file(layer, path, &bytes, *format)
        }
    }
}

fn parse_file(
    layer: &str,
    path: &Path,
    bytes: &[u8],
    format: Option<source::Format>,
) -> Result<Vec<RedirectRecord>, StartupError> {
    let parsed = match format {
        Some(format) => source::parse(bytes, format),
        None => source::parse_any(bytes, &DEFAULT_PROBE_ORDER).map(|(format, records)| {
            tracing::info!(layer = %layer, path = %path.display(), format = %format, "Mapping format detected");
            records
        }),
    };

    parsed.map_err(|e| StartupError::Parse {
        layer: layer.to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
