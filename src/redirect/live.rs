//! The currently published chain.
//!
//! Readers take a snapshot per request; a reload builds a complete
//! replacement off to the side and publishes it with one pointer swap.
//! A snapshot stays valid for as long as its holder keeps it.
//!
//! Anything the dispatcher needs alongside the chain (the settings it was
//! compiled from) travels in the same snapshot as `context`, so a reader
//! never pairs one generation's chain with another generation's settings.

use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::redirect::chain::FallbackChain;

/// One published generation: a chain and the context it was compiled with.
#[derive(Debug)]
pub struct Published<T, C = ()> {
    chain: FallbackChain<T>,
    context: C,
}

impl<T, C> Published<T, C> {
    pub fn new(chain: FallbackChain<T>, context: C) -> Self {
        Self { chain, context }
    }

    pub fn chain(&self) -> &FallbackChain<T> {
        &self.chain
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<T, C> Deref for Published<T, C> {
    type Target = FallbackChain<T>;

    fn deref(&self) -> &Self::Target {
        &self.chain
    }
}

#[derive(Debug)]
pub struct LiveChain<T, C = ()> {
    current: ArcSwap<Published<T, C>>,
}

impl<T, C> LiveChain<T, C> {
    pub fn new(chain: FallbackChain<T>, context: C) -> Self {
        Self {
            current: ArcSwap::from_pointee(Published::new(chain, context)),
        }
    }

    /// Snapshot of the generation in effect right now.
    pub fn load(&self) -> Arc<Published<T, C>> {
        self.current.load_full()
    }

    /// Replace the published generation. Returns the one it replaced.
    pub fn publish(&self, chain: FallbackChain<T>, context: C) -> Arc<Published<T, C>> {
        self.current.swap(Arc::new(Published::new(chain, context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::{ChainBuilder, RedirectTable, Resolver};
    use crate::source::RedirectRecord;

    fn chain_with(destination: &str) -> FallbackChain<()> {
        let table = RedirectTable::from_records(vec![RedirectRecord::new("/a", destination)]);
        ChainBuilder::new(()).wrap(Resolver::new("t", table)).build()
    }

    #[test]
    fn test_publish_swaps_atomically() {
        let live = LiveChain::new(chain_with("old"), ());
        let before = live.load();

        let replaced = live.publish(chain_with("new"), ());
        assert_eq!(replaced.resolve("/a").unwrap().destination, "old");
        assert_eq!(live.load().resolve("/a").unwrap().destination, "new");

        // A snapshot taken before the swap keeps its view.
        assert_eq!(before.resolve("/a").unwrap().destination, "old");
    }

    #[test]
    fn test_context_travels_with_chain() {
        let live = LiveChain::new(chain_with("old"), 301u16);
        live.publish(chain_with("new"), 308u16);

        let snapshot = live.load();
        assert_eq!(snapshot.resolve("/a").unwrap().destination, "new");
        assert_eq!(*snapshot.context(), 308);
        assert_eq!(snapshot.chain().len(), 1);
    }
}
