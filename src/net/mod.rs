//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.tls set?
//!     no  → tokio TcpListener → axum::serve
//!     yes → tls.rs (load PEM pair) → axum-server rustls acceptor
//! ```
//!
//! # Design Decisions
//! - TLS is optional and off by default
//! - Missing certificate files fail startup before anything binds

pub mod tls;
