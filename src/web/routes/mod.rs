//! Web Routes
//!
//! Route handlers organized by functionality.

pub mod entries;
pub mod health;
pub mod pages;
pub mod transfer;

use crate::view::RangeMode;
use crate::web::error::WebError;

/// Parse an optional `range` query value
pub(crate) fn parse_range(value: Option<&str>) -> Result<Option<RangeMode>, WebError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: crate::view::ParseRangeModeError| WebError::BadRequest(e.to_string())),
    }
}
