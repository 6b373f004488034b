//! Charts module - panel layout, chart binding and rendering

pub mod layout;
mod plotter;
mod renderer;
mod spec;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer, DEFAULT_WIDTH as EXPORT_WIDTH};
pub use spec::{bind, ChartSpec};
