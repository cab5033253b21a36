//! HTTP API
//!
//! Routes:
//! - `POST /api/feedback` analyze and store feedback
//! - `GET /api/feedback` list stored feedback (`?language=&product=`)
//! - `GET /api/stats` sentiment distribution
//! - `POST /api/translate` translate without storing
//! - `GET /api/health`
//!
//! Cross-origin requests are accepted only from the local frontend dev server.

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

pub use error::ApiError;
pub use state::AppState;

/// The only origin allowed to call the API from a browser
pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Build the axum router with all API routes
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([HeaderValue::from_static(DEV_FRONTEND_ORIGIN)]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let nosniff = SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    Router::new()
        .route(
            "/api/feedback",
            get(handlers::list_feedback).post(handlers::submit_feedback),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/translate", axum::routing::post(handlers::translate))
        .route("/api/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().layer(cors).layer(nosniff))
        .with_state(state)
}

/// Bind and serve until Ctrl+C / SIGTERM
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<(), std::io::Error> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Feedlens API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Feedlens API shut down");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
