//! Fallback chain composition.
//!
//! # Responsibilities
//! - Order resolvers so the last registered one is consulted first
//! - Stop at the first hit; hand misses to an explicit terminal
//! - Expose the chain's structure for inspection
//!
//! # Design Decisions
//! - The chain is a plain list (outermost first) plus a terminal value,
//!   not nested closures, so its shape can be inspected and tested
//! - The terminal is opaque: the chain only hands it back on a miss
//! - `route` returns one [`Dispatch`] value, so a request can never be
//!   both redirected and passed to the terminal

use serde::{Deserialize, Serialize};

use crate::redirect::resolver::Resolver;

/// A resolver hit: where to redirect, and which layer said so.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectSignal<'a> {
    pub destination: &'a str,
    pub layer: &'a str,
}

/// Outcome of routing one path through the chain.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch<'a, T> {
    /// A resolver matched; no further resolver was consulted.
    Redirect(RedirectSignal<'a>),
    /// Every resolver missed; the terminal handles the request.
    Fallback(&'a T),
}

/// One resolver layer as seen from outside the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    pub entries: usize,
}

/// Resolvers in check order (outermost first), ending in `terminal`.
#[derive(Debug, Clone)]
pub struct FallbackChain<T> {
    resolvers: Vec<Resolver>,
    terminal: T,
}

impl<T> FallbackChain<T> {
    /// A chain with no resolvers: every path reaches the terminal.
    pub fn terminal_only(terminal: T) -> Self {
        Self {
            resolvers: Vec::new(),
            terminal,
        }
    }

    /// First hit for `path`, checking the outermost resolver first.
    pub fn resolve(&self, path: &str) -> Option<RedirectSignal<'_>> {
        self.resolvers.iter().find_map(|resolver| {
            resolver.resolve(path).map(|destination| RedirectSignal {
                destination,
                layer: resolver.name(),
            })
        })
    }

    /// Route `path` to exactly one of a resolver hit or the terminal.
    pub fn route(&self, path: &str) -> Dispatch<'_, T> {
        match self.resolve(path) {
            Some(signal) => Dispatch::Redirect(signal),
            None => Dispatch::Fallback(&self.terminal),
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Resolvers in check order.
    pub fn resolvers(&self) -> impl Iterator<Item = &Resolver> {
        self.resolvers.iter()
    }

    /// Layer names and sizes in check order.
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.resolvers
            .iter()
            .map(|r| LayerInfo {
                name: r.name().to_string(),
                entries: r.table().len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Sum of entries across all layers (shadowed paths counted per layer).
    pub fn total_entries(&self) -> usize {
        self.resolvers.iter().map(|r| r.table().len()).sum()
    }
}

/// Builds a [`FallbackChain`] from the inside out.
///
/// ```
/// use urlshort::redirect::{ChainBuilder, RedirectTable, Resolver};
/// use urlshort::source::RedirectRecord;
///
/// let inner = Resolver::new("inner", RedirectTable::from_records(vec![
///     RedirectRecord::new("/a", "Y"),
///     RedirectRecord::new("/b", "Z"),
/// ]));
/// let outer = Resolver::new("outer", RedirectTable::from_records(vec![
///     RedirectRecord::new("/a", "X"),
/// ]));
///
/// let chain = ChainBuilder::new("not found").wrap(inner).wrap(outer).build();
/// assert_eq!(chain.resolve("/a").unwrap().destination, "X");
/// assert_eq!(chain.resolve("/b").unwrap().destination, "Z");
/// assert!(chain.resolve("/c").is_none());
/// ```
#[derive(Debug)]
pub struct ChainBuilder<T> {
    /// Registration order: innermost first.
    registered: Vec<Resolver>,
    terminal: T,
}

impl<T> ChainBuilder<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            registered: Vec::new(),
            terminal,
        }
    }

    /// Wrap the chain built so far; `resolver` becomes the outermost layer.
    pub fn wrap(mut self, resolver: Resolver) -> Self {
        self.registered.push(resolver);
        self
    }

    pub fn build(self) -> FallbackChain<T> {
        let mut resolvers = self.registered;
        resolvers.reverse();
        FallbackChain {
            resolvers,
            terminal: self.terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::table::RedirectTable;
    use crate::source::RedirectRecord;

    fn resolver(name: &str, pairs: &[(&str, &str)]) -> Resolver {
        let records = pairs.iter().map(|(p, d)| RedirectRecord::new(*p, *d));
        Resolver::new(name, RedirectTable::from_records(records))
    }

    /// R1 wraps R2, so R1 is checked first.
    fn two_layer_chain() -> FallbackChain<&'static str> {
        let r2 = resolver("r2", &[("/a", "Y"), ("/b", "Z")]);
        let r1 = resolver("r1", &[("/a", "X")]);
        ChainBuilder::new("terminal").wrap(r2).wrap(r1).build()
    }

    #[test]
    fn test_outer_layer_takes_precedence() {
        let chain = two_layer_chain();
        assert_eq!(
            chain.route("/a"),
            Dispatch::Redirect(RedirectSignal { destination: "X", layer: "r1" })
        );
    }

    #[test]
    fn test_miss_falls_through_to_inner_layer() {
        let chain = two_layer_chain();
        assert_eq!(
            chain.route("/b"),
            Dispatch::Redirect(RedirectSignal { destination: "Z", layer: "r2" })
        );
    }

    #[test]
    fn test_chain_wide_miss_reaches_terminal() {
        let chain = two_layer_chain();
        match chain.route("/c") {
            Dispatch::Fallback(terminal) => assert_eq!(*terminal, "terminal"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_reaches_terminal() {
        let chain = ChainBuilder::new(404u16)
            .wrap(Resolver::new("empty", RedirectTable::empty()))
            .build();
        assert_eq!(chain.route("/anything"), Dispatch::Fallback(&404));
    }

    #[test]
    fn test_terminal_only_chain() {
        let chain = FallbackChain::terminal_only(());
        assert!(chain.is_empty());
        assert_eq!(chain.route("/"), Dispatch::Fallback(&()));
    }

    #[test]
    fn test_layers_in_check_order() {
        let chain = ChainBuilder::new(())
            .wrap(resolver("first-registered", &[("/a", "1")]))
            .wrap(resolver("second", &[("/a", "2"), ("/b", "2")]))
            .wrap(resolver("last-registered", &[]))
            .build();

        let names: Vec<String> = chain.layers().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["last-registered", "second", "first-registered"]);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.total_entries(), 3);
        assert_eq!(chain.resolve("/a").unwrap().layer, "second");
    }

    #[test]
    fn test_shared_across_threads() {
        let chain = std::sync::Arc::new(two_layer_chain());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let chain = chain.clone();
                std::thread::spawn(move || {
                    let path = if i % 2 == 0 { "/a" } else { "/b" };
                    chain.resolve(path).map(|s| s.destination.to_string())
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let expected = if i % 2 == 0 { "X" } else { "Z" };
            assert_eq!(handle.join().unwrap().as_deref(), Some(expected));
        }
    }
}
