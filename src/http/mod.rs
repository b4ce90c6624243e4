//! HTTP surface of the gateway.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (LiveGateway: pick the installed gateway)
//!     → gateway.rs (middleware stack, CORS decision in cors.rs)
//!     → handlers.rs (/, /health, /openapi.json)
//!       or a mounted route group
//!     → response back out through the same layers
//! ```

pub mod cors;
pub mod gateway;
pub mod handlers;
pub mod request;
pub mod server;

pub use gateway::Gateway;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{GatewayServer, LiveGateway};
