//! Web front end
//!
//! Server-rendered HTML over the same `BpBook` the CLI uses, built with Axum.
//!
//! # Endpoints
//!
//! ## Pages
//! - `GET /?page=home|all&range=30|90|all` - Main page
//! - `GET /chart.svg?range=` - Current chart (404 when charting is disabled)
//!
//! ## Entries
//! - `POST /entries` - Add a measurement
//! - `GET /entries/:id/edit` - Edit form
//! - `POST /entries/:id` - Apply an edit
//! - `GET /entries/:id/delete` - Delete confirmation
//! - `POST /entries/:id/delete` - Delete (needs `confirm=yes`)
//!
//! ## Transfer
//! - `GET /export` - Download `bpbook.csv`
//! - `POST /import` - Upload a CSV file (multipart field `file`)
//!
//! ## Health
//! - `GET /health` - Status, entry count, version
//!
//! Every form answers with a `303 See Other` back to `/`; validation errors
//! render a message page with status 422.

pub mod error;
pub mod html;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::AppState;

use crate::config::WebConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let entry_routes = Router::new()
        .route("/", post(routes::entries::create_entry))
        .route("/:id", post(routes::entries::update_entry))
        .route("/:id/edit", get(routes::entries::edit_form))
        .route(
            "/:id/delete",
            get(routes::entries::delete_form).post(routes::entries::delete_entry),
        );

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::pages::index))
        .route("/chart.svg", get(routes::pages::chart_svg))
        .route("/export", get(routes::transfer::export_csv))
        .route("/import", post(routes::transfer::import_csv))
        .route("/health", get(routes::health::health))
        .nest("/entries", entry_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the web server
pub async fn serve(state: AppState, config: &WebConfig) -> Result<(), WebError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("bpbook listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("bpbook web shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
