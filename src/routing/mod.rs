//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route groups (chat, dashboard, test fakes)
//!     → group.rs (RouteGroup: name, tag, RouteSpec list)
//!     → table.rs (prefix + mount, collision checks)
//!     → axum Router + MountedRoute list
//! ```
//!
//! # Design Decisions
//! - Routes compiled at gateway build time, immutable afterwards
//! - Groups are trait objects so the gateway never depends on their internals
//! - Ambiguity is a startup error, not a runtime tie-break

pub mod group;
pub mod table;

pub use group::{GroupMount, RouteGroup, RouteSpec};
pub use table::{MountedRoute, RouteError, RouteTable};
