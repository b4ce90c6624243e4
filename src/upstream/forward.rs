//! Request forwarding to an upstream service.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream authority
//! - Strip hop-by-hop headers, keep everything else
//! - Stream the upstream response back unchanged
//! - Map connection failures to 502

use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{
        header::{self, HeaderName},
        uri::{Authority, PathAndQuery, Scheme},
        HeaderMap, HeaderValue, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::http::request::request_id;

/// Shared HTTP client for all upstreams.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the client used to reach upstream services.
pub fn build_client(connect_timeout: Duration) -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(connect_timeout));
    connector.set_nodelay(true);
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::PROXY_AUTHORIZATION,
];

/// An upstream service reachable over plain HTTP.
#[derive(Clone)]
pub struct Upstream {
    authority: Authority,
    client: UpstreamClient,
}

impl Upstream {
    /// Parse an `http://host[:port]` base URL.
    pub fn new(base: &str, client: UpstreamClient) -> Option<Self> {
        let url = Url::parse(base).ok()?;
        if url.scheme() != "http" {
            return None;
        }
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        let authority = format!("{host}:{port}").parse::<Authority>().ok()?;
        Some(Self { authority, client })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Forward `request` and return the upstream's response.
    pub async fn forward(&self, request: Request) -> Response {
        let (mut parts, body) = request.into_parts();
        let request_id = request_id(&parts.headers).unwrap_or("unknown").to_string();

        let path_and_query = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let uri = match Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
        {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };

        strip_hop_by_hop(&mut parts.headers);
        if let Ok(host) = HeaderValue::from_str(self.authority.as_str()) {
            parts.headers.insert(header::HOST, host);
        }
        parts.uri = uri;
        parts.version = Version::HTTP_11;

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            uri = %parts.uri,
            "Forwarding to upstream"
        );

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    upstream = %self.authority,
                    error = %e,
                    "Upstream error"
                );
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove("keep-alive");
    headers.remove("proxy-connection");
}
