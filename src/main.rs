//! Health check reconciler (v1)
//!
//! Keeps cloud load-balancer health checks in line with the backend ports an
//! ingress controller serves.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ loader ──▶ validation ──▶ ReconcilerConfig
//!        │                                        │
//!        └── watcher (hot reload) ────────────────┤
//!                                                 ▼
//!   resync tick ──▶ ControllerRunner ──▶ SyncController ──▶ Reconciler
//!                   (retry/backoff)     (owned ports, GC)    │      │
//!                                                            ▼      ▼
//!                                               TemplateResolver  HealthCheckStore
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use hc_reconciler::config::{load_config, watcher::ConfigWatcher, ReconcilerConfig};
use hc_reconciler::lifecycle::shutdown::wait_for_signal;
use hc_reconciler::lifecycle::{bootstrap, Shutdown};
use hc_reconciler::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "hc-reconciler")]
#[command(about = "Reconciles load-balancer health checks with backend ports", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "hc-reconciler.toml")]
    config: PathBuf,

    /// Run a single reconciliation pass and exit.
    #[arg(long)]
    once: bool,

    /// Do not reload the configuration when the file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_exists = cli.config.exists();
    let config = if config_exists {
        load_config(&cli.config)?
    } else {
        ReconcilerConfig::default()
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("hc-reconciler v0.1.0 starting");
    if !config_exists {
        tracing::warn!(path = ?cli.config, "Config file not found, using defaults");
    }

    tracing::info!(
        ports = ?config.controller.ports,
        overrides = config.overrides.len(),
        resync_interval_secs = config.controller.resync_interval_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = bootstrap(&config)?;

    if cli.once {
        let report = app.runner.pass().await;
        app.store.save_to_file()?;
        if !report.is_success() {
            return Err(format!("{} port(s) failed to reconcile", report.failures.len()).into());
        }
        return Ok(());
    }

    // Keep the watcher alive for the lifetime of the loop.
    let (_watcher, config_updates) = if config_exists && !cli.no_watch {
        let (watcher, rx) = ConfigWatcher::new(&cli.config);
        (Some(watcher.run()?), rx)
    } else {
        let (_, rx) = mpsc::unbounded_channel();
        (None, rx)
    };

    let shutdown = Shutdown::new();
    let controller = tokio::spawn(app.runner.run(config_updates, shutdown.subscribe()));

    wait_for_signal().await?;
    shutdown.trigger();
    controller.await?;

    app.store.save_to_file()?;
    tracing::info!("Shutdown complete");
    Ok(())
}
