use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use redstone_host::{ConfigLoadError, HostConfig, HostLoop, InMemoryRegistrar, demo, init_logging};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks instead of waiting for Ctrl+C
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<HostConfig> {
    let result = match &cli.config {
        Some(path) => HostConfig::load_from(path),
        None => HostConfig::load(),
    };

    match result {
        Ok(config) => Ok(config),
        Err(ConfigLoadError::NotFound) => Ok(HostConfig::default()),
        Err(e) => Err(e).context("Failed to load config"),
    }
}

fn init_config(cli: &Cli) -> anyhow::Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => HostConfig::config_path().context("Failed to determine config directory")?,
    };

    HostConfig::default().save_to(&path)?;
    eprintln!("Config file created at: {}", path.display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        return init_config(&cli);
    }

    let config = load_config(&cli)?;
    let _log_guard = init_logging("host", &config.logging)?;

    info!(target: "host", "Starting redstone host...");

    let mut host = HostLoop::from_config(&config);
    for hosted in host.bridges() {
        demo::install(&hosted.bridge);
    }

    host.start()?;

    let mut registrar = InMemoryRegistrar::new();
    let summary = host.open_registries(&mut registrar)?;
    info!(target: "host", "Registered {} object(s)", summary.total());

    host.announce_started();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(target: "host", "Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    host.run(shutdown, cli.ticks).await;

    Ok(())
}
