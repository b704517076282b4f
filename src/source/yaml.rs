//! YAML mapping blobs.
//!
//! Expected shape:
//! ```yaml
//! - path: /some-path
//!   url: https://www.some-url.com/demo
//! ```

use crate::source::{ParseError, RedirectRecord};

/// Parse a YAML sequence of `{path, url}` mappings.
///
/// An empty (or whitespace-only) document holds no records.
pub fn parse(bytes: &[u8]) -> Result<Vec<RedirectRecord>, ParseError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let records: Vec<RedirectRecord> = serde_yaml::from_slice(bytes)?;
    Ok(records)
}
