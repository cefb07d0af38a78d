use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use strata_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Momentum carousel over abstraction chains")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/strata/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal carousel
    Run {
        /// Chain JSON file (defaults to general.chain_file, then a demo chain)
        chain: Option<PathBuf>,
    },
    /// Replay a scripted session headlessly and print every frame
    Simulate {
        /// Script file with one command per line
        script: PathBuf,
        /// Chain JSON file (defaults to general.chain_file, then a demo chain)
        #[arg(long)]
        chain: Option<PathBuf>,
        /// Pace frames with a wall-clock interval instead of a fixed timestep
        #[arg(long)]
        realtime: bool,
        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
        /// Fixed timestep in milliseconds (defaults to 1000 / fps)
        #[arg(long)]
        frame_ms: Option<f64>,
    },
    /// Print the effective configuration
    Config {
        /// Write the defaults to the config path
        #[arg(long)]
        write: bool,
        /// Overwrite an existing config file
        #[arg(long, requires = "write")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    });

    // The terminal UI owns the screen, so its logs go to a file
    let log_file = matches!(cli.command, Some(Commands::Run { .. }) | None).then(|| config.log_path());
    init_logging(&config, log_file.as_deref())?;

    match cli.command {
        Some(Commands::Run { chain }) => commands::run::run(config, chain).await,
        None => commands::run::run(config, None).await,
        Some(Commands::Simulate {
            script,
            chain,
            realtime,
            json,
            frame_ms,
        }) => {
            let options = commands::simulate::SimulateOptions {
                realtime,
                json,
                frame_ms,
            };
            commands::simulate::run(config, &script, chain, options).await
        }
        Some(Commands::Config { write, force }) => commands::config::run(&config, write, force),
    }
}

fn init_logging(config: &AppConfig, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
