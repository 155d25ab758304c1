use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::handle_client;
use crate::config::ServerConfig;
use crate::error::FtpServerError;
use crate::error::handlers::handle_error;
use crate::server::ServerContext;

/// Owns the control listener and the settings shared by all sessions
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    /// Binds the control listener described by `config`
    pub async fn bind(config: &ServerConfig) -> Result<Self, FtpServerError> {
        let root = config.network.server_root_path();
        if !root.is_dir() {
            return Err(FtpServerError::InvalidRoot(root));
        }

        Self::with_context(config, ServerContext::from_config(config)).await
    }

    /// Binds with an explicit context, e.g. a custom metadata source
    pub async fn with_context(
        config: &ServerConfig,
        context: ServerContext,
    ) -> Result<Self, FtpServerError> {
        let socket = config.network.control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            FtpServerError::Transport(e)
        })?;

        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per control connection.
    /// Per-connection failures are logged and never stop the loop.
    pub async fn run(self) {
        info!("Accepting control connections");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let context = Arc::clone(&self.context);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, addr, context).await {
                            warn!("Session with {} ended with an error", addr);
                            handle_error(&FtpServerError::Transport(e));
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
