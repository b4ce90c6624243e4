//! HTTP server.
//!
//! # Responsibilities
//! - Hold the currently installed gateway
//! - Dispatch each request to whichever gateway is installed when it arrives
//! - Serve plain HTTP (axum) or HTTPS (axum-server + rustls)
//! - Stop on the shutdown broadcast
//!
//! # Design Decisions
//! - Reload swaps a whole `Gateway`; a request never sees half a config
//! - The listener outlives reloads, so bind address and TLS changes
//!   need a restart

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::{Request, State},
    response::Response,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;

use crate::http::gateway::Gateway;

/// Grace period for in-flight TLS connections after shutdown is requested.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle on the gateway currently serving traffic.
#[derive(Clone)]
pub struct LiveGateway {
    current: Arc<ArcSwap<Gateway>>,
}

impl LiveGateway {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(gateway)),
        }
    }

    /// Snapshot of the installed gateway.
    pub fn current(&self) -> Arc<Gateway> {
        self.current.load_full()
    }

    /// Install a new gateway. In-flight requests finish on the old one.
    pub fn replace(&self, gateway: Gateway) {
        self.current.store(Arc::new(gateway));
    }

    /// Router forwarding every request to the installed gateway.
    pub fn into_router(self) -> Router {
        Router::new().fallback(dispatch).with_state(self)
    }
}

async fn dispatch(State(live): State<LiveGateway>, request: Request) -> Response {
    let router = live.current.load().router();
    match router.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    live: LiveGateway,
}

impl GatewayServer {
    pub fn new(live: LiveGateway) -> Self {
        Self { live }
    }

    /// Serve plain HTTP on `listener` until shutdown is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.live.into_router().into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until shutdown is signalled.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.live.into_router().into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
