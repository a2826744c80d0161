//! Web Error Types
//!
//! Errors raised by handlers, rendered as an HTML message page with a
//! matching status code.

use crate::repository::RepositoryError;
use crate::web::html;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Handler error types
#[derive(Error, Debug)]
pub enum WebError {
    /// Malformed request (bad query value, broken upload)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No entry with this id
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Repository operation failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            WebError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            WebError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            WebError::Repository(RepositoryError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Check your input")
            }
            WebError::Repository(RepositoryError::NoValidRows) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Nothing to import")
            }
            WebError::Repository(_) | WebError::Internal(_) | WebError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, title) = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        (status, Html(html::message_page(title, &self.to_string()))).into_response()
    }
}

/// Result type for handlers
pub type WebResult<T> = Result<T, WebError>;
