//! Analysis pipeline: load, clean, summarize, select, render.
//!
//! Stages run strictly in sequence. The cleaned table and the top-country
//! selection are passed explicitly to every chart stage.

use crate::charts::{ChartViewer, StaticChartRenderer};
use crate::config::AnalysisConfig;
use crate::data::{DataCleaner, DataLoader, DataProcessor, GroupTotal, TopCountries};
use crate::stats::{ColumnSummary, CorrelationMatrix, CorrelationTable, DescribeTable, StatsCalculator};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Descriptive statistics and correlation over the numeric columns.
#[derive(Debug, Clone)]
pub struct Summary {
    pub describe: Vec<ColumnSummary>,
    pub correlation: CorrelationMatrix,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub top_countries: Vec<GroupTotal>,
    pub charts: Vec<PathBuf>,
}

impl RunReport {
    pub fn rows_after_cleaning(&self) -> usize {
        self.rows_loaded - self.duplicates_removed
    }
}

pub fn summarize(df: &DataFrame) -> PolarsResult<Summary> {
    let numeric = DataLoader::get_numeric_columns(df);
    Ok(Summary {
        describe: StatsCalculator::describe(df, &numeric)?,
        correlation: StatsCalculator::correlation_matrix(df, &numeric)?,
    })
}

pub fn write_summary<W: Write>(summary: &Summary, out: &mut W) -> io::Result<()> {
    write!(out, "{}", DescribeTable(&summary.describe))?;
    writeln!(out)?;
    write!(out, "{}", CorrelationTable(&summary.correlation))?;
    out.flush()
}

/// Render the four charts in order, showing each one before drawing the next.
pub fn render_charts(
    df: &DataFrame,
    top: &TopCountries,
    config: &AnalysisConfig,
) -> Result<Vec<PathBuf>> {
    let columns = &config.columns;
    let renderer = StaticChartRenderer::new(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let viewer = ChartViewer::new(config.open_charts);
    let mut charts = Vec::with_capacity(4);

    let age_totals = DataProcessor::age_group_totals(df, columns, &config.unknown_label)?;
    let bar = renderer
        .render_bar_chart(&age_totals)
        .context("rendering bar chart")?;
    viewer.show(&bar)?;
    charts.push(bar);

    let series = DataProcessor::yearly_means(&top.subset, columns, &top.names())?;
    let line = renderer
        .render_line_chart(&series, &config.region, config.year_start, config.year_end)
        .context("rendering line chart")?;
    viewer.show(&line)?;
    charts.push(line);

    let matrix = StatsCalculator::correlation_matrix(df, &columns.correlation_columns())
        .context("computing heatmap correlations")?;
    let heatmap = renderer
        .render_heatmap(&matrix)
        .context("rendering heatmap")?;
    viewer.show(&heatmap)?;
    charts.push(heatmap);

    let sex_totals =
        DataProcessor::sex_totals_for_year(df, columns, config.pie_year, &config.unknown_label)?;
    let pie = renderer
        .render_pie_chart(&sex_totals, config.pie_year)
        .context("rendering pie chart")?;
    viewer.show(&pie)?;
    charts.push(pie);

    info!(count = charts.len(), dir = %renderer.output_dir().display(), "charts rendered");
    Ok(charts)
}

/// Run the whole analysis, writing the summary tables to `out`.
pub fn run_with_output<W: Write>(config: &AnalysisConfig, out: &mut W) -> Result<RunReport> {
    config.validate()?;

    let mut df = DataLoader::new(config.infer_schema_length)
        .load_csv(&config.input_path, &config.columns)
        .with_context(|| format!("loading {}", config.input_path.display()))?;
    let rows_loaded = df.height();

    let duplicates_removed =
        DataCleaner::drop_duplicates(&mut df).context("removing duplicate rows")?;

    let summary = summarize(&df).context("computing summary statistics")?;
    write_summary(&summary, out).context("writing summary")?;

    let top = DataProcessor::top_countries(&df, config).context("selecting top countries")?;
    let charts = render_charts(&df, &top, config)?;

    Ok(RunReport {
        rows_loaded,
        duplicates_removed,
        top_countries: top.ranked,
        charts,
    })
}

/// Run the whole analysis, printing the summary tables to standard output.
pub fn run(config: &AnalysisConfig) -> Result<RunReport> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(config, &mut out)
}
