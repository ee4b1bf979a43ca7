use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

mod api;
mod config;
mod error;
mod media;
mod payment;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,
}

/// An explicit path wins; otherwise the first existing file under the XDG
/// config home, then `~/.config`.
fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = args.config.clone().or_else(|| std::env::var("CONFIG_FILE").ok()) {
        return Some(path);
    }

    let search_dirs = [
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        dirs::home_dir().map(|home| home.join(".config")),
    ];

    config::find_config_file(search_dirs.into_iter().flatten())
        .map(|path| path.display().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = get_config_path(&args);
    let config_file = match &config_path {
        Some(path) => Some(
            config::ConfigFile::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path))?,
        ),
        None => None,
    };

    let mut config = config::Config::from_env(config_file)?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("Starting grabpay...");
    match &config_path {
        Some(path) => info!("Loaded config from: {}", path),
        None => info!("No config file found, using environment only"),
    }

    api::run(config).await
}
