use dohgate_api::{create_api_routes, AppState};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub async fn start_web_server(
    bind_addr: SocketAddr,
    state: AppState,
    doh_path: &str,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        doh_url = format!("http://{}{}", bind_addr, doh_path),
        "Starting web server"
    );

    let app = create_api_routes(state, doh_path).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Web server started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
    }
}
