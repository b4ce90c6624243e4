//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the API prefix and route path grammar
//! - Reject unsafe CORS combinations (wildcard origin with credentials)
//! - Validate addresses, origins and upstream URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Route collisions are detected by the route table, which also sees
//!   groups that do not come from the config file

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, Method};
use axum::routing::MethodFilter;
use thiserror::Error;
use url::Url;

use crate::config::schema::{CorsConfig, GatewayConfig, RouteGroupConfig, WILDCARD};

/// A semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.prefix {0:?} must start with '/'")]
    PrefixMissingLeadingSlash(String),

    #[error("api.prefix {0:?} must not end with '/'")]
    PrefixTrailingSlash(String),

    #[error("api.prefix {0:?} contains an empty segment, whitespace or route pattern syntax")]
    PrefixMalformed(String),

    #[error("cors: wildcard origin cannot be combined with allow_credentials = true")]
    WildcardWithCredentials,

    #[error("cors: {0:?} is not a serialized origin (expected scheme://host[:port])")]
    InvalidOrigin(String),

    #[error("cors: {0:?} is not a valid HTTP method")]
    InvalidCorsMethod(String),

    #[error("cors: {0:?} is not a valid header name")]
    InvalidCorsHeader(String),

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("group {0:?} is declared more than once")]
    DuplicateGroup(String),

    #[error("group {group:?}: mount {mount:?} must be a single path segment")]
    InvalidMount { group: String, mount: String },

    #[error("group {group:?}: upstream {upstream:?} must be an http:// URL with a host and no path")]
    InvalidUpstream { group: String, upstream: String },

    #[error("group {group:?}: {method:?} is not a valid HTTP method")]
    InvalidRouteMethod { group: String, method: String },

    #[error("group {group:?}: {method:?} cannot be routed (use a standard HTTP method)")]
    UnsupportedRouteMethod { group: String, method: String },

    #[error("group {group:?}: route path {path:?} must be empty or a '/'-separated list of segments")]
    InvalidRoutePath { group: String, path: String },

    #[error("group {group:?}: route path {path:?} uses ':param'; write '{{param}}' instead")]
    ColonRouteParameter { group: String, path: String },
}

/// Validate a complete configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_prefix(&config.api.prefix) {
        errors.push(e);
    }

    validate_cors(&config.cors, &mut errors);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let mut seen = HashSet::new();
    for group in &config.groups {
        if !seen.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }
        validate_group(group, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the API prefix: `/a/b`, never `/a/` or `a/b`.
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if !prefix.starts_with('/') {
        return Err(ValidationError::PrefixMissingLeadingSlash(prefix.to_string()));
    }
    if prefix.ends_with('/') {
        return Err(ValidationError::PrefixTrailingSlash(prefix.to_string()));
    }
    if !prefix[1..].split('/').all(is_literal_segment) {
        return Err(ValidationError::PrefixMalformed(prefix.to_string()));
    }
    Ok(())
}

/// A mount is exactly one literal path segment, e.g. `chat`.
pub fn is_valid_mount(segment: &str) -> bool {
    is_literal_segment(segment)
}

/// Route paths are relative to their mount: either empty (the mount itself)
/// or `/seg/{param}/{*rest}` with the catch-all only in last position.
pub fn is_valid_route_path(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, seg)| {
        if let Some(name) = seg.strip_prefix("{*").and_then(|s| s.strip_suffix('}')) {
            i == last && is_param_name(name)
        } else if let Some(name) = seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            is_param_name(name)
        } else {
            is_literal_segment(seg)
        }
    })
}

/// Check that `origin` is exactly what a browser would send in `Origin`.
pub fn validate_origin(origin: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidOrigin(origin.to_string());
    let url = Url::parse(origin).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.origin().ascii_serialization() != origin {
        return Err(invalid());
    }
    Ok(())
}

fn validate_cors(cors: &CorsConfig, errors: &mut Vec<ValidationError>) {
    if cors.allows_any_origin() && cors.allow_credentials {
        errors.push(ValidationError::WildcardWithCredentials);
    }

    for origin in cors.allowed_origins.iter().filter(|o| *o != WILDCARD) {
        if let Err(e) = validate_origin(origin) {
            errors.push(e);
        }
    }

    for method in cors.allowed_methods.iter().filter(|m| *m != WILDCARD) {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidCorsMethod(method.clone()));
        }
    }

    for header in cors.allowed_headers.iter().filter(|h| *h != WILDCARD) {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidCorsHeader(header.clone()));
        }
    }
}

fn validate_group(group: &RouteGroupConfig, errors: &mut Vec<ValidationError>) {
    if !is_valid_mount(&group.mount) {
        errors.push(ValidationError::InvalidMount {
            group: group.name.clone(),
            mount: group.mount.clone(),
        });
    }

    if !is_valid_upstream(&group.upstream) {
        errors.push(ValidationError::InvalidUpstream {
            group: group.name.clone(),
            upstream: group.upstream.clone(),
        });
    }

    for route in &group.routes {
        if let Err(e) = route_method(&group.name, &route.method) {
            errors.push(e);
        }
        if route.path.split('/').any(|seg| seg.starts_with(':')) {
            errors.push(ValidationError::ColonRouteParameter {
                group: group.name.clone(),
                path: route.path.clone(),
            });
        } else if !is_valid_route_path(&route.path) {
            errors.push(ValidationError::InvalidRoutePath {
                group: group.name.clone(),
                path: route.path.clone(),
            });
        }
    }
}

/// Parse a configured route method, refusing methods the router cannot
/// dispatch on (extension methods such as `PURGE`).
pub fn route_method(group: &str, method: &str) -> Result<(Method, MethodFilter), ValidationError> {
    let parsed = Method::from_bytes(method.as_bytes()).map_err(|_| {
        ValidationError::InvalidRouteMethod {
            group: group.to_string(),
            method: method.to_string(),
        }
    })?;
    let filter = MethodFilter::try_from(parsed.clone()).map_err(|_| {
        ValidationError::UnsupportedRouteMethod {
            group: group.to_string(),
            method: method.to_string(),
        }
    })?;
    Ok((parsed, filter))
}

fn is_valid_upstream(upstream: &str) -> bool {
    match Url::parse(upstream) {
        Ok(url) => {
            url.scheme() == "http"
                && url.host_str().is_some()
                && url.path() == "/"
                && url.query().is_none()
                && url.username().is_empty()
        }
        Err(_) => false,
    }
}

// A leading ':' is the pre-0.8 parameter syntax, which the router refuses.
fn is_literal_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with(':')
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '*' | '/' | '?' | '#'))
}

fn is_param_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteEntry;

    fn group(name: &str) -> RouteGroupConfig {
        RouteGroupConfig {
            name: name.to_string(),
            tag: None,
            mount: "chat".to_string(),
            upstream: "http://127.0.0.1:9001".to_string(),
            routes: vec![RouteEntry {
                method: "POST".to_string(),
                path: "/send".to_string(),
            }],
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_prefix_rules() {
        assert!(validate_prefix("/api/v1").is_ok());
        assert!(validate_prefix("/api").is_ok());
        assert_eq!(
            validate_prefix("api/v1"),
            Err(ValidationError::PrefixMissingLeadingSlash("api/v1".into()))
        );
        assert_eq!(
            validate_prefix("/api/v1/"),
            Err(ValidationError::PrefixTrailingSlash("/api/v1/".into()))
        );
        assert_eq!(
            validate_prefix("/"),
            Err(ValidationError::PrefixTrailingSlash("/".into()))
        );
        assert!(matches!(
            validate_prefix(""),
            Err(ValidationError::PrefixMissingLeadingSlash(_))
        ));
        assert!(matches!(
            validate_prefix("/api//v1"),
            Err(ValidationError::PrefixMalformed(_))
        ));
        assert!(matches!(
            validate_prefix("/api/{version}"),
            Err(ValidationError::PrefixMalformed(_))
        ));
    }

    #[test]
    fn test_wildcard_origin_with_credentials_rejected() {
        let mut config = GatewayConfig::default();
        config.cors.allowed_origins.push("*".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::WildcardWithCredentials]);

        config.cors.allow_credentials = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_origin_must_be_serialized_origin() {
        assert!(validate_origin("http://localhost:3000").is_ok());
        assert!(validate_origin("https://v0-dynamic-api-dashboard.vercel.app").is_ok());
        assert!(validate_origin("http://localhost:3000/").is_err());
        assert!(validate_origin("https://example.com/app").is_err());
        assert!(validate_origin("https://example.com:443").is_err());
        assert!(validate_origin("localhost:3000").is_err());
        assert!(validate_origin("ftp://example.com").is_err());
    }

    #[test]
    fn test_route_path_grammar() {
        assert!(is_valid_route_path(""));
        assert!(is_valid_route_path("/send"));
        assert!(is_valid_route_path("/dashboard/user/{user_id}"));
        assert!(is_valid_route_path("/files/{*rest}"));
        assert!(!is_valid_route_path("/"));
        assert!(!is_valid_route_path("send"));
        assert!(!is_valid_route_path("/send/"));
        assert!(!is_valid_route_path("/{*rest}/tail"));
        assert!(!is_valid_route_path("/user/{}"));
        assert!(!is_valid_route_path("/user/{id"));
        assert!(!is_valid_route_path("/user/:user_id"));
        assert!(is_valid_route_path("/time/12:30"));
    }

    #[test]
    fn test_colon_parameters_rejected() {
        let mut config = GatewayConfig::default();
        let mut dashboard = group("dashboard");
        dashboard.routes.push(RouteEntry {
            method: "GET".to_string(),
            path: "/dashboard/user/:user_id".to_string(),
        });
        config.groups = vec![dashboard];

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ColonRouteParameter {
                group: "dashboard".into(),
                path: "/dashboard/user/:user_id".into(),
            }])
        );

        assert!(matches!(
            validate_prefix("/api/:version"),
            Err(ValidationError::PrefixMalformed(_))
        ));
        assert!(!is_valid_mount(":chat"));
    }

    #[test]
    fn test_extension_methods_rejected() {
        assert!(route_method("chat", "post").is_err());
        assert_eq!(route_method("chat", "POST").map(|(m, _)| m), Ok(Method::POST));

        let mut config = GatewayConfig::default();
        let mut chat = group("chat");
        chat.routes.push(RouteEntry {
            method: "PURGE".to_string(),
            path: "/cache".to_string(),
        });
        config.groups = vec![chat];

        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::UnsupportedRouteMethod {
                group: "chat".into(),
                method: "PURGE".into(),
            }])
        );
    }

    #[test]
    fn test_collects_all_group_errors() {
        let mut config = GatewayConfig::default();
        let mut broken = group("chat");
        broken.mount = "chat/v2".to_string();
        broken.upstream = "https://chat.internal/base".to_string();
        broken.routes.push(RouteEntry {
            method: "BAD METHOD".to_string(),
            path: "no-slash".to_string(),
        });
        config.groups = vec![broken, group("chat")];
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        assert!(errors.contains(&ValidationError::DuplicateGroup("chat".into())));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidMount { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidUpstream { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidRouteMethod { .. })));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidRoutePath { .. })));
    }

    #[test]
    fn test_bad_addresses() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "localhost".to_string();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
