//! Upstream route groups.
//!
//! # Data Flow
//! ```text
//! [[groups]] in config
//!     → group.rs (UpstreamGroup: declared routes, one upstream each)
//!     → routing::RouteTable (mounted under {prefix}/{mount})
//!     → forward.rs (rewrite URI, forward over shared client, stream back)
//! ```
//!
//! # Design Decisions
//! - Only declared (method, path) pairs are forwarded; anything else is a
//!   gateway 404, so collisions stay detectable
//! - Paths are forwarded as received, prefix included
//! - Plain HTTP upstreams only

pub mod forward;
pub mod group;

pub use forward::{build_client, Upstream, UpstreamClient};
pub use group::{mounts_from_config, UpstreamGroup};
