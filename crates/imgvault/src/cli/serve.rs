//! The `imgvault storage|rotate|resize` commands.

use clap::Args;
use imgvault_core::{Config, ConfigError, ServerHandle};

/// Listener overrides shared by every service.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on, 0 for a random port (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the transform services.
#[derive(Args, Debug)]
pub struct TransformServeArgs {
    #[command(flatten)]
    pub listen: ServeArgs,

    /// Base URL of the storage service (overrides config)
    #[arg(long, env = "IMGVAULT_STORAGE_URL")]
    pub storage_url: Option<String>,
}

fn apply_listen(args: ServeArgs, host: &mut String, port: &mut u16) {
    if let Some(h) = args.host {
        *host = h;
    }
    if let Some(p) = args.port {
        *port = p;
    }
}

/// Apply the override and re-run the checks the config file gets.
fn apply_storage_url(
    config: &mut Config,
    storage_url: Option<String>,
) -> Result<(), ConfigError> {
    if let Some(url) = storage_url {
        config.client.storage_url = url;
        config.validate()?;
    }
    Ok(())
}

pub async fn storage(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    apply_listen(args, &mut config.storage.host, &mut config.storage.port);
    let handle = imgvault_core::start_storage_service(&config).await?;
    run_until_ctrl_c("Storage", handle).await
}

pub async fn rotation(mut config: Config, args: TransformServeArgs) -> anyhow::Result<()> {
    apply_listen(args.listen, &mut config.rotation.host, &mut config.rotation.port);
    apply_storage_url(&mut config, args.storage_url)?;
    tracing::info!("Fetching images from {}", config.client.storage_url);
    let handle = imgvault_core::start_rotation_service(&config).await?;
    run_until_ctrl_c("Rotation", handle).await
}

pub async fn resizing(mut config: Config, args: TransformServeArgs) -> anyhow::Result<()> {
    apply_listen(args.listen, &mut config.resizing.host, &mut config.resizing.port);
    apply_storage_url(&mut config, args.storage_url)?;
    tracing::info!("Fetching images from {}", config.client.storage_url);
    let handle = imgvault_core::start_resizing_service(&config).await?;
    run_until_ctrl_c("Resizing", handle).await
}

async fn run_until_ctrl_c(label: &str, handle: ServerHandle) -> anyhow::Result<()> {
    println!("{label} service running at {}", handle.url());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    handle.stop().await;
    Ok(())
}
