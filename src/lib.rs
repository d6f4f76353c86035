//! Suicide Stats - dataset summary and static charts
//!
//! Loads the suicide-rate table, removes duplicate rows, prints descriptive
//! statistics and a correlation matrix, then renders bar, line, heatmap and
//! pie charts.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use config::{AnalysisConfig, ColumnMap};
pub use pipeline::{run, run_with_output, RunReport};
