//! HTTP surface exposing `record`/`get_similar` over a fused MinHash index.
//!
//! Not specified by the core index's design (the HTTP serialization layer
//! and its test harnesses are explicitly out of scope there); carried as
//! ambient surface the way the teacher ships its own `crates/server`.

mod config;
mod error;
mod routes;
mod state;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::router;
pub use state::AppState;

use manager::FeatureManager;
use tower_http::trace::TraceLayer;

/// Serve the fused manager over HTTP until the process receives a shutdown
/// signal. Mirrors the teacher's `crates/server` bind/serve shape.
pub async fn serve(config: ServerConfig, manager: FeatureManager<String>) -> Result<(), ServerError> {
    let state = AppState::new(manager);
    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .map_err(|e| ServerError::BadRequest(format!("failed to bind {}: {e}", config.socket_addr())))?;

    tracing::info!(addr = %config.socket_addr(), "simlsh server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::BadRequest(format!("server error: {e}")))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
