//! macrofeed-server
//!
//! Development backend for the macro dashboard: receives webhook posts from
//! the Discord bot and serves them back over the REST API the dashboard polls.

pub mod config;
pub mod routes;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::{Handle, Server};
use tokio::sync::oneshot;
use tracing::{error, info};

use macrofeed_common::Error;

pub use config::ServerConfig;
pub use routes::{AppState, router};
pub use store::UpdateStore;

/// Binds and serves in the background. Returns the bound address (useful
/// with port 0) and a sender that triggers graceful shutdown.
pub async fn start_server(config: ServerConfig) -> Result<(SocketAddr, oneshot::Sender<()>), Error> {
    let state = AppState {
        store: Arc::new(UpdateStore::new(config.max_updates)),
        macros: Arc::new(config.macros.clone()),
    };
    let app = router(state);

    let (shutdown_send, shutdown_recv) = oneshot::channel::<()>();
    let handle = Handle::new();
    let handle_clone = handle.clone();

    tokio::spawn(async move {
        let _ = shutdown_recv.await;
        handle_clone.graceful_shutdown(None);
    });

    let server = Server::bind(config.bind_addr)
        .handle(handle.clone())
        .serve(app.into_make_service());

    tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Macro server error: {}", e);
        }
        info!("Macro server shut down.");
    });

    let addr = handle.listening().await.ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            format!("could not bind {}", config.bind_addr),
        ))
    })?;
    info!("Macro server listening on http://{} ({} macros configured)", addr, config.macros.len());
    Ok((addr, shutdown_send))
}
