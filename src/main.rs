//! tiny-ftpd - Entry Point
//!
//! Usage: `tiny-ftpd [config-file]`. Without an argument `./config.toml` is
//! used when present; `TINY_FTPD_*` environment variables override it.

use env_logger::{Builder, Env};
use log::{error, info};
use std::process::ExitCode;

use tiny_ftpd::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1);
    let config = match ServerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Launching FTP server on {}...", config.network.control_socket());

    match Server::bind(&config).await {
        Ok(server) => {
            server.run().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
