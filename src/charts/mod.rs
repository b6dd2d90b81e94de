//! Charts module - Grouped bar geometry and rendering

mod layout;
mod plotter;
mod renderer;

pub use layout::GroupedBarLayout;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
