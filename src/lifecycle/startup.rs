//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the upstream client, route groups and gateway from config
//! - Start background tasks (metrics exporter, config watcher)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when the gateway is assembled)
//! - Reload failures are logged and the running gateway is kept

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::watcher::ConfigWatcher;
use crate::config::{GatewayConfig, ValidationError};
use crate::error::GatewayError;
use crate::http::{Gateway, GatewayServer, LiveGateway};
use crate::net::tls::load_tls_config;
use crate::observability::metrics::init_metrics;
use crate::upstream::{build_client, mounts_from_config};

/// Command-line settings that take precedence over the config file, on
/// startup and on every reload.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
    }
}

/// Build a gateway whose route groups forward to the configured upstreams.
pub fn assemble(config: &GatewayConfig) -> Result<Gateway, GatewayError> {
    let client = build_client(Duration::from_secs(config.timeouts.upstream_connect_secs));
    let mounts = mounts_from_config(&config.groups, &client)?;
    Gateway::build(config, &mounts)
}

/// Replace the live gateway with one built from `config`.
///
/// On error the live gateway is left untouched.
pub fn apply_reload(live: &LiveGateway, config: &GatewayConfig) -> Result<(), GatewayError> {
    if config.listener != *live.current().listener() {
        tracing::warn!(
            bind_address = %config.listener.bind_address,
            "Listener settings changed; restart to apply them"
        );
    }

    let gateway = assemble(config)?;
    let routes = gateway.routes().len();
    live.replace(gateway);
    tracing::info!(routes, "Gateway reloaded");
    Ok(())
}

/// Run the gateway until `shutdown` fires.
///
/// `watch_path` is the config file to watch when `dev.reload` is enabled.
/// `overrides` must already be applied to `config`; they are re-applied to
/// every reloaded file.
pub async fn launch(
    config: GatewayConfig,
    overrides: Overrides,
    watch_path: Option<&Path>,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), GatewayError> {
    let live = LiveGateway::new(assemble(&config)?);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse().map_err(|_| {
            ValidationError::InvalidMetricsAddress(config.observability.metrics_address.clone())
        })?;
        init_metrics(addr)?;
    }

    // Held until the server returns; dropping it stops the watch.
    let _watcher = match (config.dev.reload, watch_path) {
        (true, Some(path)) => Some(spawn_reloader(
            path,
            Duration::from_secs(config.dev.reload_poll_secs),
            overrides,
            live.clone(),
        )?),
        (true, None) => {
            tracing::info!("Auto-reload enabled but no config file to watch");
            None
        }
        (false, _) => None,
    };

    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| ValidationError::InvalidBindAddress(config.listener.bind_address.clone()))?;

    let server = GatewayServer::new(live);
    match &config.listener.tls {
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown).await?;
        }
        Some(tls) => {
            let rustls = load_tls_config(tls).await?;
            server.run_tls(addr, rustls, shutdown).await?;
        }
    }

    Ok(())
}

fn spawn_reloader(
    path: &Path,
    poll_interval: Duration,
    overrides: Overrides,
    live: LiveGateway,
) -> Result<RecommendedWatcher, GatewayError> {
    let (watcher, mut updates) = ConfigWatcher::new(path, poll_interval);
    let handle = watcher.run()?;

    tokio::spawn(async move {
        while let Some(mut config) = updates.recv().await {
            overrides.apply(&mut config);
            if let Err(e) = apply_reload(&live, &config) {
                tracing::error!(error = %e, "Reload rejected, keeping current gateway");
            }
        }
    });

    Ok(handle)
}
