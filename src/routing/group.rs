//! Route group capability.
//!
//! A route group is a named set of (method, path, handler) triples owned by
//! some collaborator. The gateway only needs to list them and know the tag
//! under which they are documented.

use std::fmt;
use std::sync::Arc;

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{on, MethodFilter, MethodRouter};

/// A single route declared by a group, relative to the group's mount path.
pub struct RouteSpec {
    pub method: Method,
    pub path: String,
    handler: MethodRouter,
}

impl RouteSpec {
    /// Declare a route for any method the router can filter on.
    ///
    /// Returns `None` for extension methods, which cannot be dispatched.
    pub fn try_new<H, T>(method: Method, path: impl Into<String>, handler: H) -> Option<Self>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone()).ok()?;
        Some(Self {
            method,
            path: path.into(),
            handler: on(filter, handler),
        })
    }

    /// Declare a route whose method has already been mapped to a filter.
    pub(crate) fn with_filter<H, T>(
        method: Method,
        filter: MethodFilter,
        path: String,
        handler: H,
    ) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self {
            method,
            path,
            handler: on(filter, handler),
        }
    }

    pub fn get<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::with_filter(Method::GET, MethodFilter::GET, path.into(), handler)
    }

    pub fn post<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::with_filter(Method::POST, MethodFilter::POST, path.into(), handler)
    }

    pub fn put<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::with_filter(Method::PUT, MethodFilter::PUT, path.into(), handler)
    }

    pub fn patch<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::with_filter(Method::PATCH, MethodFilter::PATCH, path.into(), handler)
    }

    pub fn delete<H, T>(path: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        Self::with_filter(Method::DELETE, MethodFilter::DELETE, path.into(), handler)
    }

    pub(crate) fn into_handler(self) -> MethodRouter {
        self.handler
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Trait implemented by every collaborator that contributes routes.
pub trait RouteGroup: Send + Sync {
    /// Group identifier, used in logs and collision reports.
    fn name(&self) -> &str;

    /// Documentation tag.
    fn tag(&self) -> &str {
        self.name()
    }

    /// The routes this group serves.
    fn routes(&self) -> Vec<RouteSpec>;
}

/// A group placed at `{prefix}/{segment}`.
#[derive(Clone)]
pub struct GroupMount {
    pub segment: String,
    pub group: Arc<dyn RouteGroup>,
}

impl GroupMount {
    pub fn new(segment: impl Into<String>, group: Arc<dyn RouteGroup>) -> Self {
        Self {
            segment: segment.into(),
            group,
        }
    }
}

impl fmt::Debug for GroupMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupMount")
            .field("segment", &self.segment)
            .field("group", &self.group.name())
            .finish()
    }
}
