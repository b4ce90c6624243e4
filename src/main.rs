use std::path::PathBuf;

use clap::Parser;

use chatbot_gateway::config::load_or_default;
use chatbot_gateway::lifecycle::{signals, startup, Shutdown};
use chatbot_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "chatbot-gateway", version)]
#[command(about = "HTTP front door for the L'Instant M chatbot backend", long_about = None)]
struct Cli {
    /// Configuration file. Built-in defaults are used when it does not exist.
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "gateway.toml")]
    config: PathBuf,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Do not rebuild the gateway when the config file changes.
    #[arg(long)]
    no_reload: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, found) = load_or_default(&cli.config)?;
    let overrides = startup::Overrides {
        bind_address: cli.bind,
    };
    overrides.apply(&mut config);
    if cli.no_reload {
        config.dev.reload = false;
    }

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "chatbot-gateway starting");
    if found {
        tracing::info!(path = %cli.config.display(), "Configuration loaded");
    } else {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using built-in defaults");
    }
    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.api.prefix,
        groups = config.groups.len(),
        tls = config.listener.tls.is_some(),
        reload = config.dev.reload,
        "Configuration resolved"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let watch_path = found.then_some(cli.config.as_path());
    startup::launch(config, overrides, watch_path, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
