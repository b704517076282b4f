//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Compile chain → Start listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Servers drain → Exit
//!
//! Signals (signals.rs):
//!     SIGINT, or the server exiting on its own → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then chain, then listeners
//! - A chain that fails to compile at startup is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{compile_chain, StartupError};
