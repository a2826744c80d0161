//! Page Routes
//!
//! - GET / - Home or all-entries page
//! - GET /chart.svg - The current chart as SVG

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::web::error::{WebError, WebResult};
use crate::web::html;
use crate::web::routes::parse_range;
use crate::web::state::AppState;

/// Query parameters for the main page
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// `home` or `all`
    pub page: Option<String>,
    /// `30`, `90` or `all`
    pub range: Option<String>,
}

/// Query parameters for the chart
#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub range: Option<String>,
}

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> WebResult<Html<String>> {
    let range = parse_range(params.range.as_deref())?;

    let mut book = state.book()?;
    if let Some(mode) = range {
        if mode != book.range() {
            book.set_range(mode);
        }
    }
    book.navigate(params.page.as_deref());

    Ok(Html(html::main_page(&book.screen())))
}

/// GET /chart.svg
///
/// 404 when charting is disabled.
pub async fn chart_svg(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartParams>,
) -> WebResult<Response> {
    let range = parse_range(params.range.as_deref())?;

    let mut book = state.book()?;
    if let Some(mode) = range {
        if mode != book.range() {
            book.set_range(mode);
        }
    }

    let chart = book
        .chart()
        .ok_or_else(|| WebError::NotFound("chart rendering is disabled".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, chart.content_type)],
        chart.document.clone(),
    )
        .into_response())
}
