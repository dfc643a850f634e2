//! fanren-sync - Entry Point
//!
//! Self-hosted JSON archive sync over HTTP.

use env_logger::Env;
use log::{error, info};
use std::process::ExitCode;

use fanren_sync::{Server, ServerConfig, StartupError};

#[tokio::main]
async fn main() -> ExitCode {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::load()?;

    info!("Starting fanren-sync v{}", env!("CARGO_PKG_VERSION"));
    info!("Archive directory: {}", config.data_dir_path().display());
    info!("Max request body: {} bytes", config.max_body_bytes);

    let server = Server::new(&config).await?;
    server.start().await
}
