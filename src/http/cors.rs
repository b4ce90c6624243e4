//! Cross-origin policy.
//!
//! # Responsibilities
//! - Translate `CorsConfig` into a `tower_http` CORS layer
//! - Answer every `OPTIONS` request carrying `Origin` before routing
//!
//! # Design Decisions
//! - Explicit origins are matched exactly (browsers send serialized origins)
//! - With credentials enabled, wildcard methods and headers are mirrored from
//!   the request; browsers ignore a literal `*` on credentialed requests
//! - Wildcard origin with credentials never reaches this module (validation
//!   rejects it) but is still refused here

use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::schema::{CorsConfig, WILDCARD};
use crate::config::validation::ValidationError;

/// Build the CORS layer for a validated configuration.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, ValidationError> {
    let origin = if config.allows_any_origin() {
        if config.allow_credentials {
            return Err(ValidationError::WildcardWithCredentials);
        }
        AllowOrigin::any()
    } else {
        let origins = config
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| ValidationError::InvalidOrigin(o.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let methods = if config.allowed_methods.iter().any(|m| m == WILDCARD) {
        if config.allow_credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        let methods = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.as_bytes())
                    .map_err(|_| ValidationError::InvalidCorsMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowMethods::list(methods)
    };

    let headers = if config.allowed_headers.iter().any(|h| h == WILDCARD) {
        if config.allow_credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        let headers = config
            .allowed_headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.as_bytes())
                    .map_err(|_| ValidationError::InvalidCorsHeader(h.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowHeaders::list(headers)
    };

    let mut layer = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(config.allow_credentials);

    if let Some(secs) = config.max_age_secs {
        layer = layer.max_age(Duration::from_secs(secs));
    }

    Ok(layer)
}

/// Answer `OPTIONS` requests from browsers without running any handler.
///
/// `CorsLayer` already answers full preflights (those carrying
/// `Access-Control-Request-Method`); this catches the remaining `OPTIONS`
/// requests that carry `Origin`, so that mounted groups never see them.
/// Must sit inside the CORS layer so the answer is decorated with CORS headers.
pub async fn short_circuit_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS && request.headers().contains_key(header::ORIGIN) {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}
