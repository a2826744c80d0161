//! Chart Adapter
//!
//! Builds the two-series (systolic, diastolic) line chart from the ranged
//! series and hands it to a rendering backend. The backend is optional:
//! without one every rebuild is a no-op.
//!
//! A rebuild always discards the previous chart and draws a new one from
//! scratch, so no state carries over between renders.

pub mod svg;

pub use svg::SvgBackend;

use crate::storage::Entry;
use crate::view::{ranged_series, DisplayZone, RangeMode};
use thiserror::Error;

/// Chart rendering errors
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
}

/// Line colors (systolic, diastolic)
pub const SYSTOLIC_COLOR: &str = "#475569";
pub const DIASTOLIC_COLOR: &str = "#94a3b8";

/// One line of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub color: &'static str,
    pub values: Vec<i32>,
}

/// Backend-independent chart description
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// X-axis labels, one per point
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl LineChart {
    /// Build the chart from oldest-first entries
    pub fn from_series(entries: &[Entry], zone: DisplayZone) -> Self {
        Self {
            labels: entries.iter().map(|e| zone.format_row_time(e.ts)).collect(),
            series: vec![
                Series {
                    label: "Systolic",
                    color: SYSTOLIC_COLOR,
                    values: entries.iter().map(|e| e.s).collect(),
                },
                Series {
                    label: "Diastolic",
                    color: DIASTOLIC_COLOR,
                    values: entries.iter().map(|e| e.d).collect(),
                },
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Something that can draw a `LineChart`
pub trait ChartBackend: Send {
    /// Draw the chart into a self-contained document
    fn render(&self, chart: &LineChart) -> Result<String, ChartError>;

    /// MIME type of the rendered document
    fn content_type(&self) -> &'static str;
}

/// The chart currently on display
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub chart: LineChart,
    pub mode: RangeMode,
    pub document: String,
    pub content_type: &'static str,
    /// Incremented on every rebuild
    pub generation: u64,
}

/// Owns the optional backend and the current chart instance
pub struct ChartAdapter {
    backend: Option<Box<dyn ChartBackend>>,
    current: Option<RenderedChart>,
    generation: u64,
}

impl ChartAdapter {
    pub fn new(backend: Box<dyn ChartBackend>) -> Self {
        Self {
            backend: Some(backend),
            current: None,
            generation: 0,
        }
    }

    /// An adapter with no backend; rebuilds do nothing
    pub fn disabled() -> Self {
        Self {
            backend: None,
            current: None,
            generation: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Replace the current chart with one drawn from `entries`.
    /// A failed render leaves no chart on display.
    pub fn rebuild(
        &mut self,
        entries: &[Entry],
        mode: RangeMode,
        zone: DisplayZone,
    ) -> Option<&RenderedChart> {
        let backend = self.backend.as_ref()?;

        if let Some(previous) = self.current.take() {
            tracing::debug!(generation = previous.generation, "Discarding previous chart");
        }

        let series = ranged_series(entries, mode);
        let chart = LineChart::from_series(&series, zone);
        let document = match backend.render(&chart) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(points = chart.len(), mode = %mode, "{}", e);
                return None;
            }
        };
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            points = chart.len(),
            mode = %mode,
            "Chart rebuilt"
        );

        self.current = Some(RenderedChart {
            chart,
            mode,
            document,
            content_type: backend.content_type(),
            generation: self.generation,
        });
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&RenderedChart> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Vitals;

    struct CountingBackend;

    impl ChartBackend for CountingBackend {
        fn render(&self, chart: &LineChart) -> Result<String, ChartError> {
            Ok(format!("points={}", chart.len()))
        }

        fn content_type(&self) -> &'static str {
            "text/plain"
        }
    }

    struct FailingBackend;

    impl ChartBackend for FailingBackend {
        fn render(&self, _chart: &LineChart) -> Result<String, ChartError> {
            Err(ChartError::Draw("out of ink".into()))
        }

        fn content_type(&self) -> &'static str {
            "text/plain"
        }
    }

    fn utc() -> DisplayZone {
        DisplayZone::parse("utc").unwrap()
    }

    fn entries(count: i64) -> Vec<Entry> {
        (0..count)
            .rev()
            .map(|i| Entry::with_id(format!("e{}", i), i, Vitals::new(120 + i as i32, 80, 65)))
            .collect()
    }

    #[test]
    fn test_line_chart_from_series() {
        let mut series = entries(2);
        series.reverse();

        let chart = LineChart::from_series(&series, utc());

        assert_eq!(chart.labels, vec!["70/01/01 00:00", "70/01/01 00:00"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].label, "Systolic");
        assert_eq!(chart.series[0].values, vec![120, 121]);
        assert_eq!(chart.series[1].values, vec![80, 80]);
    }

    #[test]
    fn test_disabled_adapter_is_noop() {
        let mut adapter = ChartAdapter::disabled();

        assert!(!adapter.is_available());
        assert!(adapter.rebuild(&entries(3), RangeMode::All, utc()).is_none());
        assert!(adapter.current().is_none());
    }

    #[test]
    fn test_rebuild_replaces_previous_chart() {
        let mut adapter = ChartAdapter::new(Box::new(CountingBackend));

        let first = adapter
            .rebuild(&entries(40), RangeMode::Last30, utc())
            .unwrap()
            .generation;
        let second = adapter.rebuild(&entries(40), RangeMode::All, utc()).unwrap();

        assert!(second.generation > first);
        assert_eq!(second.document, "points=40");
        assert_eq!(second.mode, RangeMode::All);
        assert_eq!(adapter.current().unwrap().generation, 2);
    }

    #[test]
    fn test_failed_render_clears_chart() {
        let mut adapter = ChartAdapter::new(Box::new(FailingBackend));

        assert!(adapter.rebuild(&entries(3), RangeMode::All, utc()).is_none());
        assert!(adapter.current().is_none());
        assert!(adapter.is_available());
    }

    #[test]
    fn test_rebuild_uses_ranged_series() {
        let mut adapter = ChartAdapter::new(Box::new(CountingBackend));

        let rendered = adapter.rebuild(&entries(40), RangeMode::Last30, utc()).unwrap();

        assert_eq!(rendered.chart.len(), 30);
        // Oldest first, so the last point is the newest entry
        assert_eq!(rendered.chart.series[0].values.last(), Some(&159));
        assert_eq!(rendered.content_type, "text/plain");
    }
}
