//! JSON mapping blobs: an array of `{"path": ..., "url": ...}` objects.

use crate::source::{ParseError, RedirectRecord};

pub fn parse(bytes: &[u8]) -> Result<Vec<RedirectRecord>, ParseError> {
    let records: Vec<RedirectRecord> = serde_json::from_slice(bytes)?;
    Ok(records)
}
