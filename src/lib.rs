//! HTTP front door for the L'Instant M chatbot backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                  CHATBOT GATEWAY                 │
//!                       │                                                  │
//!     Client Request    │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!     ──────────────────┼─▶│  server  │──▶│ gateway  │──▶│   routing   │   │
//!                       │  │ (live)   │   │ + CORS   │   │ table       │   │
//!                       │  └──────────┘   └────┬─────┘   └──────┬──────┘   │
//!                       │                      │                │          │
//!                       │            /, /health, /openapi.json  │          │
//!                       │                                       ▼          │
//!                       │                              ┌────────────────┐  │
//!                       │                              │ chat/dashboard │──┼──▶ upstream
//!                       │                              │ route groups   │  │    services
//!                       │                              └────────────────┘  │
//!                       │                                                  │
//!                       │  config · lifecycle · observability · net/tls    │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! The gateway is assembled by [`http::Gateway::build`] from a
//! [`config::GatewayConfig`] and a list of [`routing::GroupMount`]s. Any
//! type implementing [`routing::RouteGroup`] can be mounted; the binary
//! mounts [`upstream::UpstreamGroup`]s described in the config file.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::{Gateway, GatewayServer, LiveGateway};
pub use lifecycle::Shutdown;
pub use routing::{GroupMount, RouteGroup, RouteSpec};
