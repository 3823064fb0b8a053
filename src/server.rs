//! HTTP listener startup.

use axum::Router;
use tokio::net::TcpListener;

/// Bind the listener. `host` may be an IP literal (v4 or v6) or a hostname.
pub async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}

/// Serve the router until the process is killed. There is no graceful shutdown.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    tracing::info!("Backend listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
