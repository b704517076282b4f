//! A single lookup stage.

use crate::redirect::table::RedirectTable;

/// A named lookup stage over one [`RedirectTable`].
///
/// Lookups are exact string comparisons on the request path: no prefix
/// or pattern matching, case-sensitive, and trailing-slash-sensitive.
#[derive(Debug, Clone)]
pub struct Resolver {
    name: String,
    table: RedirectTable,
}

impl Resolver {
    pub fn new(name: impl Into<String>, table: RedirectTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &RedirectTable {
        &self.table
    }

    /// Destination for `path`, or `None` on a miss.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.table.get(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RedirectRecord;

    #[test]
    fn test_resolve_hit_and_miss() {
        let table = RedirectTable::from_records(vec![RedirectRecord::new(
            "/urlshort-godoc",
            "https://example.org/docs",
        )]);
        let resolver = Resolver::new("builtin", table);
        assert_eq!(resolver.name(), "builtin");
        assert_eq!(resolver.resolve("/urlshort-godoc"), Some("https://example.org/docs"));
        assert_eq!(resolver.resolve("/anything"), None);
    }

    #[test]
    fn test_case_and_slash_sensitive() {
        let table = RedirectTable::from_records(vec![
            RedirectRecord::new("/foo", "lower"),
            RedirectRecord::new("/Foo", "upper"),
        ]);
        let resolver = Resolver::new("t", table);
        assert_eq!(resolver.resolve("/foo"), Some("lower"));
        assert_eq!(resolver.resolve("/Foo"), Some("upper"));
        assert_eq!(resolver.resolve("/foo/"), None);
        assert_eq!(resolver.resolve("/FOO"), None);
    }

    #[test]
    fn test_no_prefix_matching() {
        let table = RedirectTable::from_records(vec![RedirectRecord::new("/docs", "d")]);
        let resolver = Resolver::new("t", table);
        assert_eq!(resolver.resolve("/docs/intro"), None);
        assert_eq!(resolver.resolve("/doc"), None);
    }

    #[test]
    fn test_empty_table_misses() {
        let resolver = Resolver::new("empty", RedirectTable::empty());
        assert_eq!(resolver.resolve("/anything"), None);
    }
}
