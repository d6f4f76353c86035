//! Charts module - Chart rendering and display

pub mod palette;
mod renderer;
mod viewer;

pub use renderer::{
    ChartError, StaticChartRenderer, BAR_FILE, HEATMAP_FILE, LINE_FILE, PIE_FILE,
};
pub use viewer::ChartViewer;
