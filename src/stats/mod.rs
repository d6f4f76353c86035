//! Statistics module - Descriptive statistics and correlation

mod calculator;
mod report;

pub use calculator::{ColumnSummary, CorrelationMatrix, StatsCalculator};
pub use report::{CorrelationTable, DescribeTable};
