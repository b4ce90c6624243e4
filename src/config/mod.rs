//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → http::Gateway::build
//!
//! With dev.reload enabled:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → a new Gateway is built and swapped in whole
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes produce a new gateway
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    ApiConfig, CorsConfig, DevConfig, GatewayConfig, LimitsConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RouteEntry, RouteGroupConfig, TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
