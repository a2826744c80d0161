//! Entry Routes
//!
//! - POST /entries - Add a measurement
//! - GET /entries/:id/edit - Edit form
//! - POST /entries/:id - Apply an edit
//! - GET /entries/:id/delete - Delete confirmation
//! - POST /entries/:id/delete - Delete once confirmed

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::repository::{AddForm, EditForm, RepositoryError, DELETE_PROMPT};
use crate::web::error::{WebError, WebResult};
use crate::web::html;
use crate::web::state::AppState;

/// Body of the delete confirmation form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub confirm: String,
}

impl DeleteForm {
    fn confirmed(&self) -> bool {
        self.confirm.eq_ignore_ascii_case("yes")
    }
}

/// POST /entries
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> WebResult<Redirect> {
    let entry = state.book()?.add(&form)?;
    tracing::debug!(id = %entry.id, "Entry created via web");
    Ok(Redirect::to("/"))
}

/// GET /entries/:id/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let book = state.book()?;
    let entry = book.entry(&id).ok_or(WebError::NotFound(id.clone()))?;
    Ok(Html(html::edit_page(entry, book.zone())))
}

/// POST /entries/:id
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> WebResult<Redirect> {
    let mut book = state.book()?;
    if book.entry(&id).is_none() {
        return Err(WebError::NotFound(id));
    }

    let request = form.to_request().map_err(RepositoryError::from)?;
    book.edit(&id, &request)?;
    Ok(Redirect::to("/"))
}

/// GET /entries/:id/delete
pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> WebResult<Html<String>> {
    let book = state.book()?;
    let entry = book.entry(&id).ok_or(WebError::NotFound(id.clone()))?;
    Ok(Html(html::delete_page(entry, book.zone(), DELETE_PROMPT)))
}

/// POST /entries/:id/delete
///
/// Without `confirm=yes` nothing is removed.
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> WebResult<Redirect> {
    let mut book = state.book()?;
    if book.entry(&id).is_none() {
        return Err(WebError::NotFound(id));
    }

    let confirmed = form.confirmed();
    book.delete(&id, &|_: &str| confirmed)?;
    Ok(Redirect::to("/"))
}
