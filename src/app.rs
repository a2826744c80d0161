//! Application controller
//!
//! `BpBook` wires the repository, view renderer, chart adapter and router
//! together. Both front ends (CLI and web) drive the book only through this
//! type; every successful mutation or range change redraws the chart.

use crate::chart::{ChartAdapter, RenderedChart, SvgBackend};
use crate::config::{Config, ConfigError};
use crate::repository::{
    AddForm, Confirm, EditRequest, EntryRepository, ImportSummary, NewEntry, RepositoryResult,
    ValidationError,
};
use crate::router::{Route, Router};
use crate::storage::{Entry, KeyValueStore, Persistence, DEFAULT_STORAGE_KEY};
use crate::transfer::CsvExport;
use crate::view::{DisplayZone, RangeMode, Row, ViewRenderer};
use chrono::Local;

/// How a book is assembled
#[derive(Debug, Clone)]
pub struct BookOptions {
    pub storage_key: String,
    pub chart_enabled: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    pub default_range: RangeMode,
    pub zone: DisplayZone,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            chart_enabled: true,
            chart_width: 800,
            chart_height: 400,
            default_range: RangeMode::default(),
            zone: DisplayZone::default(),
        }
    }
}

impl BookOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            storage_key: config.storage.key.clone(),
            chart_enabled: config.chart.enabled,
            chart_width: config.chart.width,
            chart_height: config.chart.height,
            default_range: config.default_range()?,
            zone: config.display_zone()?,
        })
    }
}

/// Everything a front end needs to draw the current page
#[derive(Debug, Clone)]
pub struct Screen {
    pub route: Route,
    pub range: RangeMode,
    /// Newest entries for the home page
    pub recent: Vec<Row>,
    /// Every entry, newest first
    pub all: Vec<Row>,
    /// Default value for the add form's date field
    pub now_input: String,
    pub chart: Option<RenderedChart>,
}

impl Screen {
    /// Rows belonging to the visible page
    pub fn rows(&self) -> &[Row] {
        match self.route {
            Route::Home => &self.recent,
            Route::All => &self.all,
        }
    }
}

/// The blood pressure book
pub struct BpBook {
    repository: EntryRepository,
    chart: ChartAdapter,
    router: Router,
    renderer: ViewRenderer,
    range: RangeMode,
}

impl BpBook {
    /// Load the stored entries and draw the initial chart
    pub fn open(store: Box<dyn KeyValueStore>, options: BookOptions) -> Self {
        let persistence = Persistence::with_key(store, options.storage_key);
        let repository = EntryRepository::open(persistence);

        let chart = if options.chart_enabled {
            ChartAdapter::new(Box::new(SvgBackend::new(
                options.chart_width,
                options.chart_height,
            )))
        } else {
            tracing::info!("Chart rendering disabled");
            ChartAdapter::disabled()
        };

        let mut book = Self {
            repository,
            chart,
            router: Router::new(),
            renderer: ViewRenderer::new(options.zone),
            range: options.default_range,
        };
        book.redraw_chart();
        book
    }

    /// All entries, newest first
    pub fn entries(&self) -> &[Entry] {
        self.repository.entries()
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.repository.get(id)
    }

    pub fn len(&self) -> usize {
        self.repository.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repository.is_empty()
    }

    pub fn range(&self) -> RangeMode {
        self.range
    }

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn zone(&self) -> DisplayZone {
        self.renderer.zone()
    }

    /// Validate the add form and store the measurement
    pub fn add(&mut self, form: &AddForm) -> RepositoryResult<Entry> {
        let new_entry = self.parse_form(form)?;
        let entry = self.repository.add_new(new_entry)?;
        self.redraw_chart();
        Ok(entry)
    }

    /// Replace an entry's values; `Ok(None)` if the id is unknown
    pub fn edit(&mut self, id: &str, request: &EditRequest) -> RepositoryResult<Option<Entry>> {
        let updated = self.repository.edit(id, request)?;
        if updated.is_some() {
            self.redraw_chart();
        }
        Ok(updated)
    }

    /// Delete an entry once `confirm` agrees; `Ok(None)` if nothing was removed
    pub fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> RepositoryResult<Option<Entry>> {
        let removed = self.repository.delete(id, confirm)?;
        if removed.is_some() {
            self.redraw_chart();
        }
        Ok(removed)
    }

    pub fn import_csv(&mut self, text: &str) -> RepositoryResult<ImportSummary> {
        let summary = self.repository.import_csv(text)?;
        self.redraw_chart();
        Ok(summary)
    }

    pub fn export_csv(&self) -> RepositoryResult<CsvExport> {
        self.repository.export_csv()
    }

    /// Switch the chart range and redraw
    pub fn set_range(&mut self, mode: RangeMode) {
        self.range = mode;
        self.redraw_chart();
    }

    /// Show the page named by a fragment (`#home`, `#all`) and redraw the
    /// chart for it
    pub fn navigate(&mut self, fragment: Option<&str>) -> Route {
        let route = self.router.go(fragment);
        self.redraw_chart();
        route
    }

    /// The current chart, if a backend is configured
    pub fn chart(&self) -> Option<&RenderedChart> {
        self.chart.current()
    }

    pub fn screen(&self) -> Screen {
        let entries = self.repository.entries();
        Screen {
            route: self.router.current(),
            range: self.range,
            recent: self.renderer.recent_rows(entries),
            all: self.renderer.all_rows(entries),
            now_input: self.renderer.zone().now_input_value(),
            chart: self.chart.current().cloned(),
        }
    }

    fn parse_form(&self, form: &AddForm) -> Result<NewEntry, ValidationError> {
        match self.renderer.zone() {
            DisplayZone::Local => form.parse_in(&Local),
            DisplayZone::Fixed(offset) => form.parse_in(&offset),
        }
    }

    fn redraw_chart(&mut self) {
        self.chart
            .rebuild(self.repository.entries(), self.range, self.renderer.zone());
    }
}
