//! Route table assembly.
//!
//! # Responsibilities
//! - Place every group's routes under `{prefix}/{segment}`
//! - Detect (method, path) collisions within and across groups
//! - Detect paths the router would refuse (same shape, different parameter names)
//! - Produce the immutable list of mounted routes
//!
//! # Design Decisions
//! - Collisions are errors, never first-registered-wins
//! - Paths are compared by shape: `/user/{id}` and `/user/{user_id}` are the
//!   same route to the router, whatever the parameter is called
//! - Built once per gateway; nothing is registered after `register`

use std::collections::{HashMap, HashSet};

use axum::http::Method;
use axum::routing::MethodRouter;
use axum::Router;
use thiserror::Error;

use crate::config::validation::{is_valid_mount, is_valid_route_path, validate_prefix, ValidationError};
use crate::routing::group::GroupMount;

/// Error raised while assembling the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error(transparent)]
    Prefix(#[from] ValidationError),

    #[error("route group {0:?} is mounted more than once")]
    DuplicateGroup(String),

    #[error("route group {group:?}: mount {mount:?} must be a single path segment")]
    InvalidMount { group: String, mount: String },

    #[error("route group {group:?}: path {path:?} is not a valid route path")]
    InvalidPath { group: String, path: String },

    #[error("{method} {path} is declared by both {first:?} and {second:?}")]
    Collision {
        method: Method,
        path: String,
        first: String,
        second: String,
    },

    #[error("{path} ({group:?}) conflicts with {existing} ({existing_group:?}): parameter names differ")]
    ParameterConflict {
        path: String,
        group: String,
        existing: String,
        existing_group: String,
    },
}

/// One route as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedRoute {
    pub group: String,
    pub tag: String,
    pub method: Method,
    pub path: String,
}

/// Validated set of mounted routes, ready to be registered on a router.
pub struct RouteTable {
    routes: Vec<MountedRoute>,
    handlers: Vec<(String, MethodRouter)>,
}

impl RouteTable {
    /// Assemble the routes of every mount under `prefix`.
    pub fn build(prefix: &str, mounts: &[GroupMount]) -> Result<Self, RouteError> {
        validate_prefix(prefix)?;

        let mut group_names = HashSet::new();
        // (method, shape) → owning group
        let mut claimed: HashMap<(Method, String), String> = HashMap::new();
        // shape → (concrete path, owning group)
        let mut shapes: HashMap<String, (String, String)> = HashMap::new();

        let mut routes = Vec::new();
        let mut handlers = Vec::new();

        for mount in mounts {
            let name = mount.group.name().to_string();
            let tag = mount.group.tag().to_string();

            if !group_names.insert(name.clone()) {
                return Err(RouteError::DuplicateGroup(name));
            }
            if !is_valid_mount(&mount.segment) {
                return Err(RouteError::InvalidMount {
                    group: name,
                    mount: mount.segment.clone(),
                });
            }

            for spec in mount.group.routes() {
                if !is_valid_route_path(&spec.path) {
                    return Err(RouteError::InvalidPath {
                        group: name,
                        path: spec.path.clone(),
                    });
                }

                let path = format!("{}/{}{}", prefix, mount.segment, spec.path);
                let shape = path_shape(&path);

                if let Some(first) = claimed.get(&(spec.method.clone(), shape.clone())) {
                    return Err(RouteError::Collision {
                        method: spec.method.clone(),
                        path,
                        first: first.clone(),
                        second: name,
                    });
                }

                match shapes.get(&shape) {
                    Some((existing, existing_group)) if *existing != path => {
                        return Err(RouteError::ParameterConflict {
                            path,
                            group: name,
                            existing: existing.clone(),
                            existing_group: existing_group.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        shapes.insert(shape.clone(), (path.clone(), name.clone()));
                    }
                }

                claimed.insert((spec.method.clone(), shape), name.clone());
                routes.push(MountedRoute {
                    group: name.clone(),
                    tag: tag.clone(),
                    method: spec.method.clone(),
                    path: path.clone(),
                });
                handlers.push((path, spec.into_handler()));
            }

            tracing::debug!(group = %name, tag = %tag, mount = %mount.segment, "Route group mounted");
        }

        Ok(Self { routes, handlers })
    }

    /// Mounted routes in registration order.
    pub fn routes(&self) -> &[MountedRoute] {
        &self.routes
    }

    /// Register every handler on `router`, returning the router and the
    /// route description.
    pub fn register(self, router: Router) -> (Router, Vec<MountedRoute>) {
        let router = self
            .handlers
            .into_iter()
            .fold(router, |router, (path, handler)| router.route(&path, handler));
        (router, self.routes)
    }
}

/// Erase parameter names: `/user/{id}/{*rest}` → `/user/{}/{*}`.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if seg.starts_with("{*") {
                "{*}"
            } else if seg.starts_with('{') {
                "{}"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
