//! SVG chart backend
//!
//! Draws the line chart with plotters into a standalone SVG document: a
//! mesh with value labels on the left, one line per series with a marker on
//! every point, date labels along the bottom and a legend.

use crate::chart::{ChartBackend, ChartError, LineChart};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

const TICK_COLOR: RGBColor = RGBColor(0x6b, 0x72, 0x80);
const MAX_X_LABELS: usize = 6;
const Y_LABELS: usize = 6;
const LINE_WIDTH: u32 = 3;

pub const EMPTY_MESSAGE: &str = "No data for selected range";

/// Renders charts as SVG
#[derive(Debug, Clone, Copy)]
pub struct SvgBackend {
    width: u32,
    height: u32,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new(800, 400)
    }
}

impl SvgBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(120),
        }
    }
}

impl ChartBackend for SvgBackend {
    fn render(&self, chart: &LineChart) -> Result<String, ChartError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE)?;

            if chart.is_empty() {
                draw_empty(&root, self.width, self.height)?;
            } else {
                draw_lines(&root, chart)?;
            }
            root.present()?;
        }
        Ok(svg)
    }

    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}

fn draw_empty<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    width: u32,
    height: u32,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal)
        .color(&TICK_COLOR)
        .pos(Pos::new(HPos::Center, VPos::Center));

    root.draw(&Text::new(
        EMPTY_MESSAGE,
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &LineChart,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    // Y range over all series, padded by 10%
    let values = chart.series.iter().flat_map(|s| s.values.iter().copied());
    let (mut y_min, mut y_max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v as f64), hi.max(v as f64))
    });
    let y_range = y_max - y_min;
    let y_padding = if y_range > 0.0 { y_range * 0.1 } else { 10.0 };
    y_min -= y_padding;
    y_max += y_padding;

    // Points sit at their index; a single point is centred
    let count = chart.len();
    let x_range = if count <= 1 {
        -1.0..1.0
    } else {
        0.0..(count - 1) as f64
    };

    let mut cc = ChartBuilder::on(root)
        .margin(16)
        .set_label_area_size(LabelAreaPosition::Left, 48)
        .set_label_area_size(LabelAreaPosition::Bottom, 36)
        .build_cartesian_2d(x_range, y_min..y_max)?;

    let x_label = |x: &f64| label_at(&chart.labels, *x);
    let y_label = |y: &f64| format!("{:.0}", y);

    cc.configure_mesh()
        .disable_x_mesh()
        .x_labels(MAX_X_LABELS)
        .y_labels(Y_LABELS)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .label_style(
            FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal).color(&TICK_COLOR),
        )
        .draw()?;

    for series in &chart.series {
        let color = hex_color(series.color);
        let points = series
            .values
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx as f64, *v as f64));

        cc.draw_series(LineSeries::new(points, color.stroke_width(LINE_WIDTH)).point_size(3))?
            .label(series.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
            });
    }

    cc.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal))
        .draw()
}

/// The x label for a tick; ticks between points get none
fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// `#rrggbb` to a plotters color; malformed channels read as 0
fn hex_color(hex: &str) -> RGBColor {
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    RGBColor(channel(1), channel(3), channel(5))
}
