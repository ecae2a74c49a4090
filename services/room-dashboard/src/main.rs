//! Room Dashboard CLI
//!
//! Command-line interface for the live hotel room dashboard.

use std::path::PathBuf;

use clap::Parser;
use room_dashboard::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "room-dashboard")]
#[command(about = "Live hotel room sensor and occupancy dashboard")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(long)]
    dashboard_port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, dashboard_port={:?}, log_level={:?}",
        args.config,
        args.dashboard_port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(dashboard_port) = args.dashboard_port {
        config.dashboard.port = dashboard_port;
    }

    tracing::info!("Starting room dashboard");
    tracing::debug!(
        "Supabase: {}, table: {}.{}, channel: {}",
        config.supabase.url,
        config.supabase.schema,
        config.supabase.table,
        config.supabase.channel
    );

    room_dashboard::run(config).await?;

    Ok(())
}
