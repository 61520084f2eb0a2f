use crate::dashboard::ChartSeries;
use anyhow::{anyhow, ensure, Result};
use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;

pub const CHART_WIDTH: u32 = 700;
pub const CHART_HEIGHT: u32 = 380;

/// Renders a closing-price line chart as an inline `<svg>` document.
pub fn render_line_chart_svg(series: &ChartSeries, size: (u32, u32)) -> Result<String> {
    let points = series.history.points();
    ensure!(!points.is_empty(), "no price data for {}", series.title);

    let min_price = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max_price = points
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);

    // Pad the price axis so a flat series still gets a visible band.
    let padding = (max_price - min_price).max(1e-8) * 0.1;
    let y_min = (min_price - padding).max(0.0);
    let y_max = max_price + padding;

    let x_min = points[0].timestamp;
    let mut x_max = points[points.len() - 1].timestamp;
    if x_max <= x_min {
        x_max = x_min + Duration::days(1);
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| anyhow!("failed to fill canvas: {e}"))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&series.title, ("sans-serif", 20.0).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| anyhow!("failed to build chart: {e}"))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("USD")
            .x_labels(6)
            .x_label_formatter(&|d: &DateTime<Utc>| d.format("%b %d").to_string())
            .draw()
            .map_err(|e| anyhow!("failed to draw mesh: {e}"))?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.timestamp, p.close)),
                &BLUE,
            ))
            .map_err(|e| anyhow!("failed to draw price line: {e}"))?;

        root.present()
            .map_err(|e| anyhow!("failed to render chart: {e}"))?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::Instrument;
    use crate::domain::price::{PriceHistory, PricePoint};
    use chrono::TimeZone;

    fn series(closes: &[f64]) -> ChartSeries {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        ChartSeries::new(
            Instrument::equity("MSFT"),
            PriceHistory::new(
                closes
                    .iter()
                    .enumerate()
                    .map(|(i, close)| PricePoint {
                        timestamp: start + Duration::days(i as i64),
                        close: *close,
                    })
                    .collect(),
            ),
        )
    }

    #[test]
    fn renders_svg_with_title_and_axis_labels() {
        let svg = render_line_chart_svg(&series(&[410.0, 412.5, 409.0, 415.25]), (600, 300)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("MSFT 30-Day Prices"));
        assert!(svg.contains("Date"));
        assert!(svg.contains("USD"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn single_point_still_renders() {
        let svg = render_line_chart_svg(&series(&[100.0]), (600, 300)).unwrap();
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn empty_history_is_an_error() {
        assert!(render_line_chart_svg(&series(&[]), (600, 300)).is_err());
    }
}
