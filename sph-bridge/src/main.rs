//! sph-bridge - Sample-ready notifications to SPH values in the lab database
//!
//! Listens on the instrument's Socket.IO channel. For every sample-ready
//! notification it fetches the sample, looks up the order/sample row,
//! derives S/P/H and writes them back. One status line per sample.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sph_bridge::settings::{resolve_instrument, resolve_store, Overrides, TerminalPrompter};
use sph_bridge::{notify, run_event_loop, InstrumentClient, NotificationHandler, Pipeline, SamplePayload};
use sph_common::config::{load_toml_config, InstrumentConfig, TomlConfig};
use sph_common::db::Store;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

const DEFAULT_LOG_FILTER: &str = "sph_bridge=info,sph_common=info";

/// Command-line arguments for sph-bridge
#[derive(Parser, Debug)]
#[command(name = "sph-bridge")]
#[command(about = "Writes SPH values for samples announced by the instrument")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/sph-bridge/config.toml)
    #[arg(long, env = "SPH_CONFIG")]
    config: Option<PathBuf>,

    /// Database host
    #[arg(long, env = "SPH_DB_HOST")]
    db_host: Option<String>,

    /// Database port
    #[arg(long, env = "SPH_DB_PORT")]
    db_port: Option<u16>,

    /// Database user
    #[arg(long, env = "SPH_DB_USER")]
    db_user: Option<String>,

    /// Database name
    #[arg(long, env = "SPH_DB_NAME")]
    db_name: Option<String>,

    /// Database password (environment only; prompted when unset)
    #[arg(long, env = "SPH_DB_PASSWORD", hide = true, hide_env_values = true)]
    db_password: Option<String>,

    /// Instrument address, e.g. http://192.168.1.31
    #[arg(long, env = "SPH_INSTRUMENT")]
    instrument: Option<String>,

    /// Instrument Socket.IO port
    #[arg(long, env = "SPH_NOTIFY_PORT")]
    notify_port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process sample-ready notifications until interrupted (default)
    Listen {
        /// Compute and log SPH values without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Compute SPH for one sample from the database
    Compute {
        /// "<order_number> <sample_id>"
        #[arg(long)]
        label: String,

        /// Measured concentration
        #[arg(long, default_value_t = 1.0)]
        concentration: f64,

        /// Also write the result to the sample row
        #[arg(long)]
        write: bool,
    },
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            db_host: self.db_host.clone(),
            db_port: self.db_port,
            db_user: self.db_user.clone(),
            db_password: self.db_password.clone(),
            db_name: self.db_name.clone(),
            instrument: self.instrument.clone(),
            notify_port: self.notify_port,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&file_config);

    info!("Starting sph-bridge v{}", env!("CARGO_PKG_VERSION"));

    let overrides = args.overrides();
    let mut prompter = TerminalPrompter;

    let store_config = resolve_store(&overrides, &file_config, &mut prompter)?;
    let store = Store::new(store_config.database_url()?);
    store
        .ping()
        .await
        .with_context(|| format!("Cannot reach database at {}:{}", store_config.host, store_config.port))?;
    info!("✓ Connected to database {} on {}", store_config.database, store_config.host);

    match args.command.unwrap_or(Command::Listen { dry_run: false }) {
        Command::Listen { dry_run } => {
            let instrument_config = resolve_instrument(&overrides, &file_config, &mut prompter)?;
            listen(store, &instrument_config, dry_run).await
        }
        Command::Compute {
            label,
            concentration,
            write,
        } => compute(store, label, concentration, write).await,
    }
}

fn init_tracing(file_config: &TomlConfig) {
    let default_filter = file_config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

async fn listen(
    store: Store,
    instrument_config: &InstrumentConfig,
    dry_run: bool,
) -> Result<()> {
    let instrument = InstrumentClient::new(instrument_config)?;
    let handler = NotificationHandler::new(instrument, Pipeline::new(store).dry_run(dry_run));

    if dry_run {
        warn!("Dry run: SPH values will be logged but not written");
    }

    let notify_url = instrument_config.notify_url()?;
    let (client, mut events) = notify::subscribe(&notify_url)
        .await
        .context("Failed to subscribe to instrument notifications")?;

    info!("Waiting for samples from {}", instrument_config.address());
    let stats = run_event_loop(&handler, &mut events, shutdown_signal()).await;

    if let Err(e) = client.disconnect().await {
        warn!("Failed to disconnect cleanly: {}", e);
    }

    info!(
        received = stats.received,
        processed = stats.processed,
        failed = stats.failed,
        "Stopped"
    );
    Ok(())
}

async fn compute(store: Store, label: String, concentration: f64, write: bool) -> Result<()> {
    let payload = SamplePayload {
        label,
        c: Some(concentration),
        ..Default::default()
    };

    let processed = Pipeline::new(store)
        .dry_run(!write)
        .process_payload(&payload)
        .await?;

    println!("{}: {}", processed.key, processed.sph);
    if processed.written {
        info!("Wrote {} for {}", processed.sph, processed.key);
    }
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
