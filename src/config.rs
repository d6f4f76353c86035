//! Analysis Configuration Module
//! Input path, output location, column names and filter thresholds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Header names of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub region: String,
    pub country: String,
    pub year: String,
    pub age_group: String,
    pub sex: String,
    pub suicide_count: String,
    pub death_rate: String,
    pub population: String,
    pub gdp: String,
    pub gdp_per_capita: String,
    pub gni: String,
    pub gni_per_capita: String,
    pub inflation_rate: String,
    pub employment_ratio: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            region: "RegionName".to_string(),
            country: "CountryName".to_string(),
            year: "Year".to_string(),
            age_group: "AgeGroup".to_string(),
            sex: "Sex".to_string(),
            suicide_count: "SuicideCount".to_string(),
            death_rate: "DeathRatePer100K".to_string(),
            population: "Population".to_string(),
            gdp: "GDP".to_string(),
            gdp_per_capita: "GDPPerCapita".to_string(),
            gni: "GrossNationalIncome".to_string(),
            gni_per_capita: "GNIPerCapita".to_string(),
            inflation_rate: "InflationRate".to_string(),
            employment_ratio: "EmploymentPopulationRatio".to_string(),
        }
    }
}

impl ColumnMap {
    /// Every header the loader requires, in file order.
    pub fn all(&self) -> Vec<&str> {
        [
            &self.region,
            &self.country,
            &self.year,
            &self.age_group,
            &self.sex,
            &self.suicide_count,
            &self.death_rate,
            &self.population,
            &self.gdp,
            &self.gdp_per_capita,
            &self.gni,
            &self.gni_per_capita,
            &self.inflation_rate,
            &self.employment_ratio,
        ]
        .into_iter()
        .map(String::as_str)
        .collect()
    }

    /// Measured quantities, always read as floating point.
    pub fn measure_columns(&self) -> Vec<&str> {
        [
            &self.suicide_count,
            &self.death_rate,
            &self.population,
            &self.gdp,
            &self.gdp_per_capita,
            &self.gni,
            &self.gni_per_capita,
            &self.inflation_rate,
            &self.employment_ratio,
        ]
        .into_iter()
        .map(String::as_str)
        .collect()
    }

    /// The eight socioeconomic columns shown in the correlation heatmap.
    pub fn correlation_columns(&self) -> Vec<String> {
        [
            &self.death_rate,
            &self.population,
            &self.gdp,
            &self.gdp_per_capita,
            &self.gni,
            &self.gni_per_capita,
            &self.inflation_rate,
            &self.employment_ratio,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

/// Everything the pipeline needs to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub open_charts: bool,
    pub infer_schema_length: usize,
    pub columns: ColumnMap,
    pub region: String,
    pub year_start: i64,
    pub year_end: i64,
    pub top_n: usize,
    pub pie_year: i64,
    pub unknown_label: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("suicide_rates_1990-2022.csv"),
            output_dir: PathBuf::from("charts"),
            open_charts: true,
            infer_schema_length: 10000,
            columns: ColumnMap::default(),
            region: "Europe".to_string(),
            year_start: 2015,
            year_end: 2020,
            top_n: 5,
            pie_year: 2015,
            unknown_label: "Unknown".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config file. Keys that are absent keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".into()));
        }
        if self.year_start > self.year_end {
            return Err(ConfigError::Invalid(format!(
                "year_start {} is after year_end {}",
                self.year_start, self.year_end
            )));
        }
        if self.region.is_empty() {
            return Err(ConfigError::Invalid("region must not be empty".into()));
        }
        if self.unknown_label.is_empty() {
            return Err(ConfigError::Invalid("unknown_label must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dataset_headers() {
        let config = AnalysisConfig::default();
        assert_eq!(config.columns.all().len(), 14);
        assert_eq!(config.columns.death_rate, "DeathRatePer100K");
        assert_eq!(config.region, "Europe");
        assert_eq!((config.year_start, config.year_end), (2015, 2020));
        assert_eq!(config.top_n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{"region": "Asia", "top_n": 3, "columns": {"year": "Yr"}}"#,
        )
        .unwrap();
        assert_eq!(config.region, "Asia");
        assert_eq!(config.top_n, 3);
        assert_eq!(config.columns.year, "Yr");
        assert_eq!(config.columns.country, "CountryName");
        assert_eq!(config.pie_year, 2015);
    }

    #[test]
    fn measures_exclude_keys_and_year() {
        let columns = ColumnMap::default();
        let measures = columns.measure_columns();
        assert_eq!(measures.len(), 9);
        assert_eq!(measures[0], "SuicideCount");
        assert!(!measures.contains(&"Year"));
        assert!(!measures.contains(&"CountryName"));
    }

    #[test]
    fn heatmap_columns_start_with_death_rate() {
        let cols = ColumnMap::default().correlation_columns();
        assert_eq!(cols.len(), 8);
        assert_eq!(cols[0], "DeathRatePer100K");
        assert_eq!(cols[7], "EmploymentPopulationRatio");
    }

    #[test]
    fn rejects_inverted_year_window() {
        let config = AnalysisConfig {
            year_start: 2021,
            year_end: 2015,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_top_n() {
        let config = AnalysisConfig {
            top_n: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
