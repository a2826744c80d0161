//! Transfer Routes
//!
//! - GET /export - Download the collection as CSV
//! - POST /import - Merge an uploaded CSV file

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::web::error::{WebError, WebResult};
use crate::web::state::AppState;

/// Multipart field carrying the CSV file
pub const IMPORT_FIELD: &str = "file";

/// GET /export
pub async fn export_csv(State(state): State<Arc<AppState>>) -> WebResult<Response> {
    let export = state.book()?.export_csv()?;

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, export.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content,
    )
        .into_response())
}

/// POST /import
pub async fn import_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> WebResult<Redirect> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(IMPORT_FIELD) {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(format!("Invalid upload: {}", e)))?;
        upload = Some(bytes);
    }

    let bytes = upload.ok_or_else(|| WebError::BadRequest("No file selected".to_string()))?;
    let text = String::from_utf8_lossy(&bytes);

    let summary = state.book()?.import_csv(&text)?;
    tracing::debug!(appended = summary.appended, replaced = summary.replaced, "Upload imported");
    Ok(Redirect::to("/"))
}
