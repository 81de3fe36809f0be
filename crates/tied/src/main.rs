//! tied — the dockertie daemon.
//!
//! Single binary that assembles the dockertie subsystems:
//! - Host inventory (JSON file or static list)
//! - Execution backend (Docker Engine API or in-memory)
//! - Scheduler (aggregation + first-fit placement)
//! - REST API
//!
//! # Usage
//!
//! ```text
//! tied serve --config /etc/dockertie/dockertie.toml
//! tied serve --inventory-path hosts.json --docker-port 2375 --port 8080
//! tied check-config --config /etc/dockertie/dockertie.toml
//! ```

mod overrides;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use tie_core::DaemonConfig;
use tie_scheduler::Scheduler;

use crate::overrides::Overrides;

#[derive(Parser)]
#[command(name = "tied", about = "dockertie daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration and print it fully resolved.
    CheckConfig {
        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tied=debug,tie=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, overrides } => {
            let config = load_config(config, &overrides)?;
            serve(Arc::new(config)).await
        }
        Command::CheckConfig { config, overrides } => {
            let config = load_config(config, &overrides)?;
            println!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Read, override, and validate the configuration. Any failure here ends
/// the process.
fn load_config(path: Option<PathBuf>, overrides: &Overrides) -> anyhow::Result<DaemonConfig> {
    let mut config = match &path {
        Some(path) => DaemonConfig::from_file(path)?,
        None => DaemonConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;

    if let Some(path) = path {
        info!(path = ?path, "configuration loaded");
    }
    Ok(config)
}

async fn serve(config: Arc<DaemonConfig>) -> anyhow::Result<()> {
    info!("dockertie daemon starting");

    let inventory = tie_inventory::from_config(&config.inventory);
    info!(inventory = ?inventory, "inventory provider ready");

    let backend = tie_backend::from_config(&config.backend);
    info!(backend = ?backend, "execution backend ready");

    let scheduler = Scheduler::new(inventory, backend);
    let router = tie_api::build_router(scheduler);

    let addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("dockertie daemon stopped");
    Ok(())
}
