//! Command line interface.

use crate::config::{AnalysisConfig, ConfigError};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "suicide-stats", version, about = "Summarize the suicide rate dataset and render charts")]
pub struct Cli {
    /// Input CSV file
    pub input: Option<PathBuf>,

    /// JSON config file; command line flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory for the rendered PNG charts
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Write the charts without opening them
    #[arg(long)]
    pub no_open: bool,

    /// Region used for the top-country line chart
    #[arg(long)]
    pub region: Option<String>,

    /// First year of the region window (inclusive)
    #[arg(long)]
    pub year_start: Option<i64>,

    /// Last year of the region window (inclusive)
    #[arg(long)]
    pub year_end: Option<i64>,

    /// Number of countries kept for the line chart
    #[arg(long = "top")]
    pub top_n: Option<usize>,

    /// Year shown in the pie chart
    #[arg(long)]
    pub pie_year: Option<i64>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_open {
            config.open_charts = false;
        }
        if let Some(region) = &self.region {
            config.region = region.clone();
        }
        if let Some(year) = self.year_start {
            config.year_start = year;
        }
        if let Some(year) = self.year_end {
            config.year_end = year;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(year) = self.pie_year {
            config.pie_year = year;
        }

        config.validate()?;
        Ok(config)
    }
}
