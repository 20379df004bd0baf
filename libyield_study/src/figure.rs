use std::ops::Range;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::comparator::ComparisonRecord;
use super::error::FigureError;
use super::process::ComparisonFigure;
use super::style::{MarkerShape, StyleColor};

const MARKER_SIZE: i32 = 5;
const ERROR_BAR_WIDTH: u32 = 6;
const RANGE_PADDING: f64 = 0.05;

/// Render the two panel comparison figure to an SVG file
pub fn render_svg(
    figure: &ComparisonFigure,
    path: &Path,
    size: (u32, u32),
) -> Result<(), FigureError> {
    if figure.records.is_empty() {
        return Err(FigureError::EmptyFigure);
    }
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_figure(&root, figure)?;
    root.present()?;
    log::info!("Figure written to {}", path.display());
    Ok(())
}

/// Draw the figure on any plotters drawing area
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &ComparisonFigure,
) -> Result<(), FigureError> {
    root.fill(&WHITE)?;
    let area = root.titled(&figure.title(), ("sans-serif", 20))?;
    let panels = area.split_evenly((1, 2));
    draw_panel(&panels[0], figure, "Average Current [uA]", |r| &r.avg_current)?;
    draw_panel(&panels[1], figure, "T2 Scaler Rate [kHz]", |r| &r.scaler_rate)?;
    Ok(())
}

fn draw_panel<DB, F>(
    area: &DrawingArea<DB, Shift>,
    figure: &ComparisonFigure,
    x_label: &str,
    x_of: F,
) -> Result<(), FigureError>
where
    DB: DrawingBackend,
    F: Fn(&ComparisonRecord) -> &Vec<f64>,
{
    let x_range = axis_range(figure.records.iter().flat_map(|r| x_of(r).iter().copied()));
    let y_range = axis_range(figure.records.iter().flat_map(|r| {
        r.metric_nominal
            .iter()
            .zip(r.metric_err.iter())
            .flat_map(|(v, e)| [v - e, v + e])
    }));

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(figure.metric.label())
        .draw()?;

    for record in figure.records.iter() {
        let color = rgb(&record.style.color);
        let points: Vec<(f64, f64, f64)> = x_of(record)
            .iter()
            .zip(record.metric_nominal.iter())
            .zip(record.metric_err.iter())
            .map(|((x, y), e)| (*x, *y, *e))
            .collect();

        chart.draw_series(LineSeries::new(
            points.iter().map(|(x, y, _)| (*x, *y)),
            color.stroke_width(1),
        ))?;
        chart.draw_series(points.iter().map(|(x, y, e)| {
            ErrorBar::new_vertical(*x, y - e, *y, y + e, color.filled(), ERROR_BAR_WIDTH)
        }))?;

        let outline = marker_outline(record.style.marker, MARKER_SIZE);
        let legend_outline = outline.clone();
        chart
            .draw_series(points.iter().map(|(x, y, _)| {
                EmptyElement::at((*x, *y)) + Polygon::new(outline.clone(), color.filled())
            }))?
            .label(record.source_label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x, y)) + Polygon::new(legend_outline.clone(), color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

fn rgb(color: &StyleColor) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Data range padded on both sides. A degenerate range is widened to a unit interval.
pub fn axis_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let span = max - min;
    if span == 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    (min - RANGE_PADDING * span)..(max + RANGE_PADDING * span)
}

/// Outline of a marker in pixel offsets around the point. Pixel y grows downward.
pub fn marker_outline(marker: MarkerShape, size: i32) -> Vec<(i32, i32)> {
    let s = size;
    let t = (size / 3).max(1);
    match marker {
        MarkerShape::Circle => (0..12)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::PI / 6.0;
                (
                    (s as f64 * angle.cos()).round() as i32,
                    (s as f64 * angle.sin()).round() as i32,
                )
            })
            .collect(),
        MarkerShape::Square => vec![(-s, -s), (s, -s), (s, s), (-s, s)],
        MarkerShape::TriangleUp => vec![(0, -s), (s, s), (-s, s)],
        MarkerShape::TriangleDown => vec![(-s, -s), (s, -s), (0, s)],
        MarkerShape::Diamond => vec![(0, -s), (s, 0), (0, s), (-s, 0)],
        MarkerShape::Plus => plus_outline(s, t),
        MarkerShape::Cross => plus_outline(s, t)
            .into_iter()
            .map(|(x, y)| {
                // rotate by 45 degrees
                let r = std::f64::consts::FRAC_1_SQRT_2;
                (
                    ((x - y) as f64 * r).round() as i32,
                    ((x + y) as f64 * r).round() as i32,
                )
            })
            .collect(),
    }
}

fn plus_outline(s: i32, t: i32) -> Vec<(i32, i32)> {
    vec![
        (-t, -s),
        (t, -s),
        (t, -t),
        (s, -t),
        (s, t),
        (t, t),
        (t, s),
        (-t, s),
        (-t, t),
        (-s, t),
        (-s, -t),
        (-t, -t),
    ]
}
