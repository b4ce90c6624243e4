//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Marker that allows any origin, method or header.
pub const WILDCARD: &str = "*";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// API metadata and mount prefix.
    pub api: ApiConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Route groups mounted under the API prefix.
    pub groups: Vec<RouteGroupConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Development conveniences (auto-reload).
    pub dev: DevConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Optional TLS configuration. When absent the listener serves plain HTTP.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// API metadata and path prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix prepended to every mounted group (e.g., "/api/v1").
    pub prefix: String,

    pub title: String,
    pub description: String,
    pub version: String,

    /// Message returned by `GET /`.
    pub welcome_message: String,

    /// Serve the route catalog at `/openapi.json`.
    pub docs_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api/v1".to_string(),
            title: "L'Instant M Chatbot API".to_string(),
            description: "API for personalized chatbot to assist users of L'Instant M website"
                .to_string(),
            version: "1.0.0".to_string(),
            welcome_message: "Bienvenue sur l'API du chatbot de L'Instant M".to_string(),
            docs_enabled: true,
        }
    }
}

/// Cross-origin resource sharing policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins, or `"*"` for any origin.
    pub allowed_origins: Vec<String>,

    /// Allow cookies and authorization headers on cross-origin requests.
    /// Cannot be combined with a wildcard origin.
    pub allow_credentials: bool,

    /// Allowed methods, or `"*"`.
    pub allowed_methods: Vec<String>,

    /// Allowed request headers, or `"*"`.
    pub allowed_headers: Vec<String>,

    /// How long browsers may cache a preflight answer.
    pub max_age_secs: Option<u64>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == WILDCARD)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://v0-dynamic-api-dashboard.vercel.app".to_string(),
                "http://localhost:3000".to_string(),
                "https://localhost:3000".to_string(),
            ],
            allow_credentials: true,
            allowed_methods: vec![WILDCARD.to_string()],
            allowed_headers: vec![WILDCARD.to_string()],
            max_age_secs: None,
        }
    }
}

/// A route group served by an external HTTP service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteGroupConfig {
    /// Group identifier for logging and collision reports.
    pub name: String,

    /// Documentation tag. Defaults to the group name.
    #[serde(default)]
    pub tag: Option<String>,

    /// Path segment under the API prefix.
    #[serde(default = "default_mount")]
    pub mount: String,

    /// Base URL of the service handling this group (e.g., "http://127.0.0.1:9001").
    pub upstream: String,

    /// Routes declared by the group, relative to its mount path.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteGroupConfig {
    pub fn tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.name)
    }
}

fn default_mount() -> String {
    "chat".to_string()
}

/// One declared (method, path) pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Upstream connection establishment timeout in seconds.
    pub upstream_connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_connect_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Development settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DevConfig {
    /// Rebuild the gateway when the config file changes.
    pub reload: bool,

    /// Poll interval for the file watcher backend, in seconds.
    pub reload_poll_secs: u64,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            reload: true,
            reload_poll_secs: 2,
        }
    }
}
