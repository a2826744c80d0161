//! Health Routes
//!
//! - GET /health - Status, entry count and version

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::web::error::WebResult;
use crate::web::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> WebResult<Json<HealthResponse>> {
    let entries = state.book()?.len();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        entries,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
