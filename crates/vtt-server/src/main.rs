//! `vtt-server`: serve Spieltisch sessions over HTTP.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use vtt_server::{ServerConfig, StoreKind, init_logging, serve};

#[derive(Parser)]
#[command(
    name = "vtt-server",
    about = "Spieltisch session server",
    version
)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Session store: memory or dir
    #[arg(long)]
    store: Option<StoreKind>,

    /// Directory for the dir store
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,

    /// Fixed dice seed
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config = config.with_bind(bind);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(store) = self.store {
            config = config.with_store(store);
        }
        if let Some(dir) = self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(level) = self.log_level {
            config = config.with_log_level(level);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config.log_level);
    serve(config).await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
