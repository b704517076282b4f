//! Redirect resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Compilation (startup / reload):
//!     Vec<RedirectRecord> per source
//!     → table.rs (fold in order, last write wins)
//!     → resolver.rs (named lookup stage)
//!     → chain.rs (wrap outer-to-inner, explicit terminal)
//!     → live.rs (atomic publish)
//!
//! Per request:
//!     path
//!     → outermost resolver ... innermost resolver
//!     → Hit(destination) | terminal
//! ```
//!
//! # Design Decisions
//! - Tables are immutable after construction (lock-free reads)
//! - Exact, case-sensitive matching; `/foo` and `/foo/` are distinct
//! - The resolver registered last is checked first
//! - Exactly one of {a resolver hit, the terminal} handles a request

pub mod chain;
pub mod live;
pub mod resolver;
pub mod table;

pub use chain::{ChainBuilder, Dispatch, FallbackChain, LayerInfo, RedirectSignal};
pub use live::{LiveChain, Published};
pub use resolver::Resolver;
pub use table::{RedirectTable, TableBuilder};
