//! imgvault CLI - image storage, format conversion and transform services.
//!
//! One binary runs any of the three services. Each service is a separate
//! process; the transform services reach storage over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Storage service (upload + retrieval with conversion)
//! imgvault storage --port 8080
//!
//! # Transform services, pointed at storage
//! imgvault rotate --storage-url http://127.0.0.1:8080
//! imgvault resize --storage-url http://127.0.0.1:8080
//!
//! # View configuration
//! imgvault config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// imgvault - image storage, format conversion and transform services.
#[derive(Parser, Debug)]
#[command(name = "imgvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "IMGVAULT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the storage service (upload, retrieval, format conversion)
    Storage(cli::serve::ServeArgs),

    /// Run the rotation service
    Rotate(cli::serve::TransformServeArgs),

    /// Run the resizing service
    Resize(cli::serve::TransformServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

// Requests are handled cooperatively on a single thread; codec work goes to
// the blocking pool.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => imgvault_core::Config::load_from(path)?,
        None => match imgvault_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `imgvault config path`."
                );
                imgvault_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("imgvault v{}", imgvault_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Storage(args) => cli::serve::storage(config, args).await,
        Commands::Rotate(args) => cli::serve::rotation(config, args).await,
        Commands::Resize(args) => cli::serve::resizing(config, args).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
