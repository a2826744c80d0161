//! # bpbook
//!
//! A personal blood pressure log: record systolic, diastolic and pulse
//! readings, browse them, chart the trend and move them in and out as CSV.
//!
//! ## Modules
//!
//! - [`storage`]: Entry model and the key-value store the collection lives in
//! - [`repository`]: The ordered, persisted collection and its mutations
//! - [`transfer`]: CSV import and export
//! - [`view`]: Rows, ranges and timestamp formatting
//! - [`chart`]: Systolic/diastolic line chart with a pluggable backend
//! - [`router`]: Home / all-entries page selection
//! - [`app`]: `BpBook`, the controller both front ends drive
//! - [`web`]: Server-rendered HTML front end with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bpbook::app::{BookOptions, BpBook};
//! use bpbook::repository::AddForm;
//! use bpbook::storage::SqliteStore;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("bpbook.db")?;
//!     let mut book = BpBook::open(Box::new(store), BookOptions::default());
//!
//!     book.add(&AddForm::new("2024-01-15T08:30", "120", "80", "65"))?;
//!
//!     for row in book.screen().recent {
//!         println!("{} {}/{} {}", row.when, row.systolic, row.diastolic, row.pulse);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod chart;
pub mod config;
pub mod logging;
pub mod repository;
pub mod router;
pub mod storage;
pub mod transfer;
pub mod view;
pub mod web;

// Re-export top-level types for convenience
pub use app::{BookOptions, BpBook, Screen};

pub use storage::{
    Entry, KeyValueStore, MemoryStore, Persistence, SqliteStore, StorageError, StorageResult,
    Vital, Vitals,
};

pub use repository::{
    AddForm, Confirm, EditRequest, EntryRepository, ImportSummary, RepositoryError,
    RepositoryResult, ValidationError,
};

pub use transfer::{CsvExport, TransferError};

pub use view::{DisplayZone, RangeMode, Row, ViewRenderer};

pub use chart::{ChartAdapter, ChartBackend, ChartError, LineChart, RenderedChart, SvgBackend};

pub use router::{Route, Router};

pub use config::{Config, ConfigError};

pub use web::{build_router, serve, AppState, WebError};
