//! Gateway assembly.
//!
//! # Responsibilities
//! - Validate the configuration
//! - Mount route groups under the API prefix
//! - Register the root endpoints (`/`, `/health`, `/openapi.json`)
//! - Wire up middleware (request ID, tracing, limits, metrics, CORS)
//!
//! # Middleware order (outermost first)
//! ```text
//! set x-request-id → trace span → propagate x-request-id → timeout
//!     → body limit → metrics → CORS → preflight short-circuit → route
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{validate_config, ConfigError, GatewayConfig, ListenerConfig};
use crate::error::GatewayError;
use crate::http::cors::{cors_layer, short_circuit_preflight};
use crate::http::handlers::{self, ApiInfo, Catalog};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::{GroupMount, MountedRoute, RouteTable};

/// A fully assembled, immutable gateway.
pub struct Gateway {
    router: Router,
    routes: Vec<MountedRoute>,
    listener: ListenerConfig,
}

impl Gateway {
    /// Build a gateway from a configuration and the groups to mount.
    ///
    /// Fails if the configuration is invalid or if the groups cannot be
    /// mounted without ambiguity.
    pub fn build(config: &GatewayConfig, mounts: &[GroupMount]) -> Result<Self, GatewayError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let table = RouteTable::build(&config.api.prefix, mounts)?;
        let (group_router, routes) = table.register(Router::new());

        let info = Arc::new(ApiInfo {
            api: config.api.clone(),
            catalog: Catalog::new(&config.api, &routes),
        });

        let mut root = Router::new()
            .route("/", get(handlers::welcome))
            .route("/health", get(handlers::health));
        if config.api.docs_enabled {
            root = root.route("/openapi.json", get(handlers::catalog));
        }

        let cors = cors_layer(&config.cors)?;
        let router = apply_layers(root.with_state(info).merge(group_router), config, cors);

        tracing::info!(
            prefix = %config.api.prefix,
            routes = routes.len(),
            origins = ?config.cors.allowed_origins,
            "Gateway assembled"
        );

        Ok(Self {
            router,
            routes,
            listener: config.listener.clone(),
        })
    }

    /// The assembled router. Cheap to clone.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Every route mounted from the groups, in registration order.
    pub fn routes(&self) -> &[MountedRoute] {
        &self.routes
    }

    /// Listener settings this gateway was built with.
    pub fn listener(&self) -> &ListenerConfig {
        &self.listener
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("routes", &self.routes)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

#[allow(deprecated)]
fn apply_layers(router: Router, config: &GatewayConfig, cors: CorsLayer) -> Router {
    router
        .layer(middleware::from_fn(short_circuit_preflight))
        .layer(cors)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}
