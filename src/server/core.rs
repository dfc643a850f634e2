use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::server::app;
use crate::server::state::AppState;

pub struct Server {
    addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Prepares the archive directory. Nothing is served until [`Server::start`].
    pub async fn new(config: &ServerConfig) -> Result<Self, StartupError> {
        let addr = config.socket_addr()?;
        let state = AppState::from_config(config);
        state.store().ensure_root().await?;

        Ok(Self { addr, state })
    }

    pub async fn start(self) -> Result<(), StartupError> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
