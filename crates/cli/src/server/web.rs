use geodoh_api::{create_router, AppState};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn start_http_server(bind_addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    info!(bind_address = %bind_addr, "Starting DoH server");

    let app = create_router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("DoH server ready to accept queries");

    axum::serve(listener, app).await?;

    Ok(())
}
