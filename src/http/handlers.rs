//! Endpoints served by the gateway itself.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::ApiConfig;
use crate::routing::MountedRoute;

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Shared, read-only data for the root endpoints.
#[derive(Debug)]
pub struct ApiInfo {
    pub api: ApiConfig,
    pub catalog: Catalog,
}

pub async fn welcome(State(info): State<Arc<ApiInfo>>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: info.api.welcome_message.clone(),
    })
}

/// Liveness probe. Takes no state and touches no collaborator.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn catalog(State(info): State<Arc<ApiInfo>>) -> Json<Catalog> {
    Json(info.catalog.clone())
}

/// Machine-readable description of the mounted API, shaped like the
/// `info`/`tags`/`paths` sections of an OpenAPI document.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub info: CatalogInfo,
    pub tags: Vec<CatalogTag>,
    pub paths: BTreeMap<String, BTreeMap<String, CatalogOperation>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogInfo {
    pub title: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogTag {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogOperation {
    pub tags: Vec<String>,
    #[serde(rename = "x-group")]
    pub group: String,
}

impl Catalog {
    pub fn new(api: &ApiConfig, routes: &[MountedRoute]) -> Self {
        let mut tags: Vec<CatalogTag> = Vec::new();
        let mut paths: BTreeMap<String, BTreeMap<String, CatalogOperation>> = BTreeMap::new();

        for route in routes {
            if !tags.iter().any(|t| t.name == route.tag) {
                tags.push(CatalogTag {
                    name: route.tag.clone(),
                });
            }
            paths.entry(route.path.clone()).or_default().insert(
                route.method.as_str().to_lowercase(),
                CatalogOperation {
                    tags: vec![route.tag.clone()],
                    group: route.group.clone(),
                },
            );
        }

        Self {
            info: CatalogInfo {
                title: api.title.clone(),
                description: api.description.clone(),
                version: api.version.clone(),
            },
            tags,
            paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_catalog_groups_methods_by_path() {
        let routes = vec![
            MountedRoute {
                group: "chat".into(),
                tag: "chat".into(),
                method: Method::POST,
                path: "/api/v1/chat/send".into(),
            },
            MountedRoute {
                group: "chat".into(),
                tag: "chat".into(),
                method: Method::GET,
                path: "/api/v1/chat/sessions".into(),
            },
            MountedRoute {
                group: "dashboard".into(),
                tag: "dashboard".into(),
                method: Method::DELETE,
                path: "/api/v1/chat/sessions".into(),
            },
        ];

        let catalog = Catalog::new(&ApiConfig::default(), &routes);
        let json = serde_json::to_value(&catalog).unwrap();

        assert_eq!(json["info"]["title"], "L'Instant M Chatbot API");
        assert_eq!(json["tags"].as_array().unwrap().len(), 2);
        assert_eq!(json["paths"]["/api/v1/chat/send"]["post"]["tags"][0], "chat");
        assert_eq!(json["paths"]["/api/v1/chat/sessions"]["get"]["x-group"], "chat");
        assert_eq!(
            json["paths"]["/api/v1/chat/sessions"]["delete"]["x-group"],
            "dashboard"
        );
    }
}
