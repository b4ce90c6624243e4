//! Route groups backed by an upstream service.

use std::sync::Arc;

use axum::{extract::Request, http::Method, routing::MethodFilter};

use crate::config::validation::route_method;
use crate::config::{RouteGroupConfig, ValidationError};
use crate::routing::{GroupMount, RouteGroup, RouteSpec};
use crate::upstream::forward::{Upstream, UpstreamClient};

/// A route group whose every declared route is forwarded to one upstream.
pub struct UpstreamGroup {
    name: String,
    tag: String,
    routes: Vec<(Method, MethodFilter, String)>,
    upstream: Arc<Upstream>,
}

impl UpstreamGroup {
    /// Build a group from its configuration.
    pub fn from_config(
        config: &RouteGroupConfig,
        client: UpstreamClient,
    ) -> Result<Self, ValidationError> {
        let upstream =
            Upstream::new(&config.upstream, client).ok_or_else(|| ValidationError::InvalidUpstream {
                group: config.name.clone(),
                upstream: config.upstream.clone(),
            })?;

        let routes = config
            .routes
            .iter()
            .map(|route| {
                route_method(&config.name, &route.method)
                    .map(|(method, filter)| (method, filter, route.path.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: config.name.clone(),
            tag: config.tag().to_string(),
            routes,
            upstream: Arc::new(upstream),
        })
    }
}

impl RouteGroup for UpstreamGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn routes(&self) -> Vec<RouteSpec> {
        self.routes
            .iter()
            .map(|(method, filter, path)| {
                let upstream = self.upstream.clone();
                RouteSpec::with_filter(method.clone(), *filter, path.clone(), move |request: Request| {
                    let upstream = upstream.clone();
                    async move { upstream.forward(request).await }
                })
            })
            .collect()
    }
}

/// Mount every configured group, sharing one client between them.
pub fn mounts_from_config(
    groups: &[RouteGroupConfig],
    client: &UpstreamClient,
) -> Result<Vec<GroupMount>, ValidationError> {
    groups
        .iter()
        .map(|config| {
            let group = UpstreamGroup::from_config(config, client.clone())?;
            tracing::info!(
                group = %config.name,
                tag = %config.tag(),
                upstream = %group.upstream.authority(),
                routes = group.routes.len(),
                "Upstream group configured"
            );
            Ok(GroupMount::new(config.mount.clone(), Arc::new(group)))
        })
        .collect()
}
