//! Chart Plotter Module
//! Draws a bound ChartSpec as four stacked, time-linked egui_plot panels.

use super::layout::{Dash, Rgb, FIGURE_STYLE};
use super::spec::{ChartRow, ChartSpec, Series};
use crate::data::timestamp::{format_plot_x, to_plot_x};
use egui::{Color32, RichText, Vec2b};
use egui_plot::{Corner, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoint, PlotPoints};

/// Link group shared by every panel of one chart.
const TIME_AXIS_GROUP: &str = "trial_time_axis";

const TICK_FORMAT: &str = "%m-%d %H:%M";
const HOVER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Draws chart specs with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw all rows, splitting `total_height` evenly.
    ///
    /// `reset_view` re-fits every panel to the full time range; otherwise the
    /// linked x view is left as the user panned or zoomed it.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec, total_height: f32, reset_view: bool) {
        let rows = spec.rows.len().max(1) as f32;
        let spacing = total_height * FIGURE_STYLE.vertical_spacing;
        let row_height = ((total_height - spacing * (rows - 1.0)) / rows).max(80.0);

        let x_min = to_plot_x(&spec.x_range[0]);
        let mut x_max = to_plot_x(&spec.x_range[1]);
        if x_max <= x_min {
            x_max = x_min + 60.0;
        }

        for (idx, row) in spec.rows.iter().enumerate() {
            if idx > 0 {
                ui.add_space(spacing);
            }
            Self::draw_row(ui, idx, row, [x_min, x_max], row_height, reset_view);
        }
    }

    fn draw_row(
        ui: &mut egui::Ui,
        idx: usize,
        row: &ChartRow,
        x_bounds: [f64; 2],
        height: f32,
        reset_view: bool,
    ) {
        let [y_lo, y_hi] = row.y_view();
        let fixed_y = row.y_range;

        Plot::new(format!("trial_row_{idx}"))
            .height(height)
            .link_axis(TIME_AXIS_GROUP, [true, false])
            .link_cursor(TIME_AXIS_GROUP, Vec2b::new(true, false))
            .allow_zoom([true, fixed_y.is_none()])
            .allow_drag([true, fixed_y.is_none()])
            .allow_scroll(false)
            .y_axis_label(row.y_title)
            .include_y(y_lo)
            .include_y(y_hi)
            .show_grid(true)
            .legend(Legend::default().position(Corner::LeftTop))
            .x_axis_formatter(|mark, _range| format_plot_x(mark.value, TICK_FORMAT))
            .label_formatter(|name, value: &PlotPoint| {
                let when = format_plot_x(value.x, HOVER_FORMAT);
                if name.is_empty() {
                    when
                } else {
                    format!("{name}\n{when}\n{:.2}", value.y)
                }
            })
            .show(ui, |plot_ui| {
                if reset_view {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [x_bounds[0], y_lo],
                        [x_bounds[1], y_hi],
                    ));
                } else if let Some([lo, hi]) = fixed_y {
                    let current = plot_ui.plot_bounds();
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [current.min()[0], lo],
                        [current.max()[0], hi],
                    ));
                }

                for series in &row.series {
                    for line in Self::series_lines(series) {
                        plot_ui.line(line);
                    }
                }
            });
    }

    /// One line per gap-free segment, all sharing the series name so the
    /// legend shows a single entry.
    fn series_lines(series: &Series) -> Vec<Line> {
        let style = series.style;
        series
            .segments()
            .into_iter()
            .map(|segment| {
                let points: PlotPoints = segment
                    .iter()
                    .map(|(t, v)| [to_plot_x(t), *v])
                    .collect();
                let mut line = Line::new(points)
                    .name(series.name)
                    .color(color32(style.color))
                    .width(style.width);
                if style.dash == Dash::Dot {
                    line = line.style(LineStyle::Dotted { spacing: 6.0 });
                }
                if style.fill_to_zero {
                    line = line.fill(0.0);
                }
                line
            })
            .collect()
    }

    /// Centered heading with the site name and minute-precision range.
    pub fn draw_heading(ui: &mut egui::Ui, heading: &str, subtitle: &str) {
        let fg = color32(FIGURE_STYLE.foreground);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(heading).size(22.0).strong().color(fg));
            ui.label(RichText::new(subtitle).size(16.0).color(fg));
        });
    }
}
