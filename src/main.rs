//! CLI entry point for scpi_bench.
//!
//! `serve` starts the JSON API over the instrument bench; `scan` runs a
//! one-shot bus discovery and prints what answered.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scpi_bench::bench::Bench;
use scpi_bench::catalog::loader::load_catalog;
use scpi_bench::config::Settings;
use scpi_bench::server::{self, AppState};
use scpi_bench::transport::Transport;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scpi_bench")]
#[command(about = "Web-controlled SCPI instrument bench", long_about = None)]
struct Cli {
    /// Configuration name under config/ (without extension)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API (default)
    Serve,
    /// Discover instruments once and print them
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref()).context("loading settings")?;
    init_tracing(&settings.log_level)?;

    let catalog =
        load_catalog(Path::new(&settings.catalog.dir)).context("loading command catalog")?;
    let transport = build_transport(&settings)?;
    let bench = Arc::new(Bench::new(catalog, transport));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let addr: SocketAddr =
                format!("{}:{}", settings.server.listen_addr, settings.server.port)
                    .parse()
                    .context("invalid listen address")?;
            server::serve(AppState { bench }, addr).await?;
        }
        Commands::Scan => {
            let instruments =
                tokio::task::spawn_blocking(move || bench.registry().discover()).await??;
            if instruments.is_empty() {
                println!("No instruments answered.");
            }
            for instrument in instruments {
                println!(
                    "{} {} (SN: {}) [{}] @ {}",
                    instrument.vendor,
                    instrument.model,
                    instrument.serial,
                    instrument.kind,
                    instrument.address
                );
            }
        }
    }
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[cfg(feature = "transport_serial")]
fn build_transport(settings: &Settings) -> Result<Arc<dyn Transport>> {
    use scpi_bench::transport::serial::SerialTransport;
    use std::time::Duration;

    Ok(Arc::new(SerialTransport::new(Duration::from_millis(
        settings.transport.read_timeout_ms,
    ))))
}

#[cfg(not(feature = "transport_serial"))]
fn build_transport(_settings: &Settings) -> Result<Arc<dyn Transport>> {
    Err(anyhow::anyhow!(
        scpi_bench::error::BenchError::SerialFeatureDisabled
    ))
}
