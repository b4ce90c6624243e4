//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Assemble gateway → Start watcher → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then gateway, then listener
//! - Config file changes rebuild the gateway, not the process

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
