//! Static Chart Renderer
//! Renders a bound ChartSpec to a PNG with plotters, mirroring the interactive view.
//!
//! Layout:
//! 1. Heading "<site> (<min_date> to <max_date>)" and subtitle, centered
//! 2. Four stacked panels sharing the time range, legend top-left in each
//! 3. Time tick labels on the bottom panel only

use super::layout::{Dash, Rgb, SeriesStyle, FIGURE_STYLE};
use super::spec::{ChartRow, ChartSpec};
use crate::data::timestamp::{format_plot_x, to_plot_x};
use plotters::chart::SeriesAnno;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_WIDTH: u32 = 1400;

const HEADER_HEIGHT: u32 = 70;
const Y_LABEL_AREA: u32 = 70;
const X_LABEL_AREA: u32 = 35;
const TICK_FORMAT: &str = "%m-%d %H:%M";
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `spec` to a PNG file at `path`.
    pub fn render_png(
        spec: &ChartSpec,
        heading: &str,
        subtitle: &str,
        path: &Path,
        width: u32,
    ) -> Result<(), RenderError> {
        let height = FIGURE_STYLE.height + HEADER_HEIGHT;
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&rgb(FIGURE_STYLE.background)).map_err(draw_err)?;

        let (header, body) = root.split_vertically(HEADER_HEIGHT);
        Self::draw_header(&header, heading, subtitle, width)?;

        let [x_min, x_max] = Self::x_span(spec);
        let panels = body.split_evenly((spec.rows.len().max(1), 1));
        let last = spec.rows.len().saturating_sub(1);
        for (idx, (row, area)) in spec.rows.iter().zip(panels.iter()).enumerate() {
            Self::draw_row(area, row, x_min..x_max, idx == last)?;
        }

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), "chart exported");
        Ok(())
    }

    fn draw_header<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        heading: &str,
        subtitle: &str,
        width: u32,
    ) -> Result<(), RenderError> {
        let fg = rgb(FIGURE_STYLE.foreground);
        let center = Pos::new(HPos::Center, VPos::Top);
        let x = (width / 2) as i32;

        let title_style = TextStyle::from((FONT, 26).into_font()).color(&fg).pos(center);
        area.draw_text(heading, &title_style, (x, 10))
            .map_err(draw_err)?;

        let sub_style = TextStyle::from((FONT, 17).into_font()).color(&fg).pos(center);
        area.draw_text(subtitle, &sub_style, (x, 42))
            .map_err(draw_err)?;
        Ok(())
    }

    /// Shared x range in plot coordinates, widened when the trial is a single instant.
    fn x_span(spec: &ChartSpec) -> [f64; 2] {
        let lo = to_plot_x(&spec.x_range[0]);
        let hi = to_plot_x(&spec.x_range[1]);
        if hi > lo {
            [lo, hi]
        } else {
            [lo - 30.0, lo + 30.0]
        }
    }

    fn draw_row<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        row: &ChartRow,
        x_range: std::ops::Range<f64>,
        show_time_labels: bool,
    ) -> Result<(), RenderError> {
        let [y_lo, y_hi] = row.y_view();
        let grid = rgb(FIGURE_STYLE.grid_color);

        let mut chart = ChartBuilder::on(area)
            .margin(6)
            .x_label_area_size(if show_time_labels { X_LABEL_AREA } else { 0 })
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(x_range, y_lo..y_hi)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .bold_line_style(grid.stroke_width(1))
            .light_line_style(grid.mix(0.4).stroke_width(1))
            .y_desc(row.y_title)
            .x_labels(if show_time_labels { 8 } else { 0 })
            .x_label_formatter(&|x: &f64| format_plot_x(*x, TICK_FORMAT))
            .draw()
            .map_err(draw_err)?;

        for series in &row.series {
            let style = series.style;
            let color = rgb(style.color);
            for (n, segment) in series.segments().into_iter().enumerate() {
                let points: Vec<(f64, f64)> =
                    segment.iter().map(|(t, v)| (to_plot_x(t), *v)).collect();
                let anno = Self::draw_segment(&mut chart, points, style)?;
                if n == 0 {
                    anno.label(series.name).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8).filled())
            .border_style(grid.stroke_width(1))
            .label_font((FONT, 13))
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_segment<'a, 'b, DB: DrawingBackend + 'a>(
        chart: &'b mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        points: Vec<(f64, f64)>,
        style: SeriesStyle,
    ) -> Result<&'b mut SeriesAnno<'a, DB>, RenderError> {
        let color = rgb(style.color);
        let stroke = color.stroke_width(style.width.round() as u32);

        if style.fill_to_zero {
            chart
                .draw_series(
                    AreaSeries::new(
                        points,
                        0.0,
                        color.mix(f64::from(FIGURE_STYLE.fill_alpha)).filled(),
                    )
                    .border_style(stroke),
                )
                .map_err(draw_err)
        } else if style.dash == Dash::Dot {
            chart
                .draw_series(DashedLineSeries::new(points, 2u32, 4u32, stroke))
                .map_err(draw_err)
        } else {
            chart
                .draw_series(LineSeries::new(points, stroke))
                .map_err(draw_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::bind;
    use crate::data::{TrialRecord, TrialTable};
    use chrono::NaiveDate;

    fn spec_with_minutes(minutes: &[u32]) -> ChartSpec {
        let records = minutes
            .iter()
            .map(|&m| {
                let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, m, 0)
                    .unwrap();
                TrialRecord::new(ts, [Some(1.0); 7])
            })
            .collect();
        bind(&TrialTable::from_records(records, 0).unwrap())
    }

    #[test]
    fn x_span_covers_trial() {
        let [lo, hi] = StaticChartRenderer::x_span(&spec_with_minutes(&[0, 10]));
        assert_eq!(hi - lo, 600.0);
    }

    #[test]
    fn every_series_style_draws_into_a_buffer() {
        let (w, h) = (120u32, 80u32);
        let mut buf = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let mut chart = ChartBuilder::on(&root)
                .build_cartesian_2d(0.0..10.0, 0.0..10.0)
                .unwrap();
            for row in &crate::charts::layout::PANEL_LAYOUT {
                for def in row.series {
                    let points = vec![(1.0, 2.0), (5.0, 8.0), (9.0, 4.0)];
                    StaticChartRenderer::draw_segment(&mut chart, points, def.style).unwrap();
                }
            }
            root.present().unwrap();
        }
        assert!(buf.iter().any(|&b| b != 255));
    }

    #[test]
    fn single_instant_gets_a_visible_span() {
        let [lo, hi] = StaticChartRenderer::x_span(&spec_with_minutes(&[7]));
        assert!(hi > lo);
    }
}
