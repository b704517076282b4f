//! Table rows: one `path <whitespace> url` record per line.
//!
//! ```text
//! # comments and blank lines are skipped
//! /docs    https://example.org/docs
//! /blog	https://blog.example.org
//! ```

use crate::source::{ParseError, RedirectRecord};

pub fn parse(bytes: &[u8]) -> Result<Vec<RedirectRecord>, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::Row {
        line: line_of_offset(bytes, e.valid_up_to()),
        reason: "not valid utf-8".to_string(),
    })?;

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match fields.as_slice() {
            [path, url] => records.push(RedirectRecord::new(*path, *url)),
            _ => {
                return Err(ParseError::Row {
                    line: idx + 1,
                    reason: format!("expected 2 fields (path, url), found {}", fields.len()),
                })
            }
        }
    }

    Ok(records)
}

fn line_of_offset(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().filter(|b| **b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let text = b"# redirects\n/a https://a.example\n\n/b\thttps://b.example\n";
        let records = parse(text).unwrap();
        assert_eq!(
            records,
            vec![
                RedirectRecord::new("/a", "https://a.example"),
                RedirectRecord::new("/b", "https://b.example"),
            ]
        );
    }

    #[test]
    fn test_extra_field_reports_line() {
        let text = b"/a https://a.example\n/b https://b.example trailing\n";
        match parse(text).unwrap_err() {
            ParseError::Row { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_url_reports_line() {
        match parse(b"\n\n/lonely\n").unwrap_err() {
            ParseError::Row { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse(b"/a https://a.example\n/\xff x\n").unwrap_err();
        assert!(matches!(err, ParseError::Row { line: 2, .. }));
    }
}
