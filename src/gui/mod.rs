//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::SupplierApp;
pub use chart_viewer::{ChartViewer, ViewContext};
pub use control_panel::{ControlPanel, ControlPanelAction};
