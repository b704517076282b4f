//! Format probing for blobs with no declared format.
//!
//! Formats are tried in a fixed order. Each attempt parses the full blob
//! from scratch, so a failed attempt leaves nothing behind. When every
//! attempt fails the individual failures are returned together.

use crate::source::{parse, Format, ParseError, RedirectRecord};

/// YAML first (it also accepts JSON documents), then JSON, then table rows.
pub const DEFAULT_PROBE_ORDER: [Format; 3] = [Format::Yaml, Format::Json, Format::TableRows];

/// Try each format in `order`, returning the first that parses.
pub fn parse_any(
    bytes: &[u8],
    order: &[Format],
) -> Result<(Format, Vec<RedirectRecord>), ParseError> {
    let mut attempts = Vec::with_capacity(order.len());

    for &format in order {
        match parse(bytes, format) {
            Ok(records) => {
                tracing::debug!(format = %format, records = records.len(), "Probed mapping format");
                return Ok((format, records));
            }
            Err(e) => attempts.push((format, e)),
        }
    }

    Err(ParseError::NoFormatMatched { attempts })
}
