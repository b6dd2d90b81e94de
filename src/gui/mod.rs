//! GUI module - Application window and chart display

mod app;
mod chart_viewer;

pub use app::TrafficChartApp;
pub use chart_viewer::{ChartView, ChartViewer};
