//! Charts module - Interactive and static chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, RadarSeries};
pub use renderer::{RenderError, ScatterGroup, StaticChartRenderer};
