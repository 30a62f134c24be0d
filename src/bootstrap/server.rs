use std::net::SocketAddr;

use crate::app::state::AppState;

/// Bind the listener and serve until the process is terminated.
///
/// A failed bind (e.g. port already in use) is fatal and propagates out of
/// `main`.
pub async fn init_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = crate::routes::routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("server is running on port {port}");

    axum::serve(listener, app).await?;

    Ok(())
}
