//! Plexus CLI - Pluggable Application Host
//!
//! Boots the host around an install root: loads `config.toml`, installs the
//! logging layer, registers the `System` capabilities, brings up every
//! discovered extension in dependency order, and runs until interrupted.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod builtins;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use plexus_capabilities::CapabilityRegistry;
use plexus_config::Config;
use plexus_extension::{HostHandle, discover, resolve};
use plexus_host::{Orchestrator, register_system_capabilities};
use plexus_telemetry::{LogConfig, LogLevel, setup_logging};

/// Plexus - Pluggable Application Host
#[derive(Parser)]
#[command(name = "plexus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Install root: holds config.toml, the extensions directory, and logs
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Override the console log level (DEBUG, INFO, WARNING, ERROR)
    #[arg(long)]
    console_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring up extensions and run until interrupted (the default)
    Run,

    /// Write a default config.toml under the install root
    Init,

    /// Discover extensions and print them in resolved start order
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Run => run(&cli).await,
        Commands::Init => init(&cli),
        Commands::List => list(&cli),
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.root.join("config.toml"))?;
    setup_logging(&log_config(&config, cli)?)?;

    let version = host_version(&config);
    info!("Plexus {version} starting at {}", cli.root.display());

    let registry = CapabilityRegistry::new();
    register_system_capabilities(
        &registry,
        &cli.root,
        Duration::from_secs(config.shell.timeout_secs),
    );

    let host = HostHandle {
        version,
        install_root: cli.root.clone(),
        extensions_dir: cli.root.join(&config.extensions.directory),
    };

    let mut orchestrator = Orchestrator::new(registry, host, builtins::factory_table());
    orchestrator.bring_up();

    info!("Press Ctrl-C to shut down");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("Shutting down");
    orchestrator.shutdown();
    Ok(())
}

fn init(cli: &Cli) -> Result<()> {
    let path = cli.root.join("config.toml");
    if path.exists() {
        bail!("config already exists at {}", path.display());
    }

    let config = Config {
        version: env!("CARGO_PKG_VERSION").to_string(),
        ..Config::default()
    };
    config.save(&path)?;

    std::fs::create_dir_all(cli.root.join(&config.extensions.directory))
        .context("failed to create the extensions directory")?;

    println!("Wrote {}", path.display());
    Ok(())
}

fn list(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.root.join("config.toml"))?;
    // Console-only logging so discovery warnings about bad manifests show.
    setup_logging(&LogConfig {
        console_level: LogLevel::Warning,
        file_level: LogLevel::Warning,
        ..LogConfig::default()
    })?;

    let extensions_dir = cli.root.join(&config.extensions.directory);
    let ordered = resolve(&discover(&extensions_dir));
    if ordered.is_empty() {
        println!("No extensions found under {}", extensions_dir.display());
        return Ok(());
    }
    for candidate in &ordered {
        println!(
            "{} {} ({})",
            candidate.name(),
            candidate.manifest.version,
            candidate.dir.display()
        );
    }
    Ok(())
}

fn log_config(config: &Config, cli: &Cli) -> Result<LogConfig> {
    let console_level = match &cli.console_level {
        Some(level) => LogLevel::from_str(level)?,
        None => LogLevel::from_str(&config.log.console_level)?,
    };
    Ok(LogConfig {
        console_level,
        file_level: LogLevel::from_str(&config.log.file_level)?,
        directory: Some(cli.root.join(&config.log.directory)),
        retention: config.log.retention,
    })
}

fn host_version(config: &Config) -> String {
    if config.version.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        config.version.clone()
    }
}
