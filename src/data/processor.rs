//! Data Processor Module
//! Filtering and grouped aggregation feeding the summary and the charts.

use crate::config::{AnalysisConfig, ColumnMap};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No rows for region '{region}' between {start} and {end}")]
    EmptySelection { region: String, start: i64, end: i64 },
}

/// Summed value for one category of a grouping column.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub label: String,
    pub value: f64,
}

/// Result of the region/year window ranking.
#[derive(Debug, Clone)]
pub struct TopCountries {
    /// Highest summed death rate first.
    pub ranked: Vec<GroupTotal>,
    /// Rows in the region/year window before the top-N cut.
    pub window_rows: usize,
    /// Window rows belonging to a ranked country.
    pub subset: DataFrame,
}

impl TopCountries {
    pub fn names(&self) -> Vec<String> {
        self.ranked.iter().map(|g| g.label.clone()).collect()
    }
}

/// Per-year mean death rate for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    pub points: Vec<(i64, f64)>,
}

/// Handles filtering and aggregation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows where region matches and year lies in `[start, end]`.
    pub fn filter_region_window(
        df: &DataFrame,
        columns: &ColumnMap,
        region: &str,
        start: i64,
        end: i64,
    ) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(columns.region.as_str())
                    .eq(lit(region))
                    .and(col(columns.year.as_str()).gt_eq(lit(start)))
                    .and(col(columns.year.as_str()).lt_eq(lit(end))),
            )
            .collect()?;
        Ok(filtered)
    }

    /// Sum `value_col` per distinct `key_col`, groups in order of first appearance.
    ///
    /// Null keys are dropped; null values contribute nothing to a sum.
    pub fn sum_by_group(
        df: &DataFrame,
        key_col: &str,
        value_col: &str,
    ) -> Result<Vec<GroupTotal>, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .filter(col(key_col).is_not_null())
            .group_by_stable([col(key_col).cast(DataType::String)])
            .agg([col(value_col).cast(DataType::Float64).sum()])
            .collect()?;

        let keys = grouped.column(key_col)?.str()?;
        let sums = grouped.column(value_col)?.f64()?;

        let totals = keys
            .into_iter()
            .zip(sums.into_iter())
            .filter_map(|(k, v)| {
                k.map(|label| GroupTotal {
                    label: label.to_string(),
                    value: v.unwrap_or(0.0),
                })
            })
            .collect();
        Ok(totals)
    }

    /// Keep the `n` largest totals. Equal totals are ordered by label so the
    /// cut at position `n` does not depend on input order.
    pub fn rank_descending(mut totals: Vec<GroupTotal>, n: usize) -> Vec<GroupTotal> {
        totals.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        totals.truncate(n);
        totals
    }

    /// Rank countries in the configured region/year window by summed death
    /// rate and keep the window rows of the top `config.top_n`.
    pub fn top_countries(
        df: &DataFrame,
        config: &AnalysisConfig,
    ) -> Result<TopCountries, ProcessorError> {
        let columns = &config.columns;
        let window = Self::filter_region_window(
            df,
            columns,
            &config.region,
            config.year_start,
            config.year_end,
        )?;
        if window.height() == 0 {
            return Err(ProcessorError::EmptySelection {
                region: config.region.clone(),
                start: config.year_start,
                end: config.year_end,
            });
        }

        let totals = Self::sum_by_group(&window, &columns.country, &columns.death_rate)?;
        let ranked = Self::rank_descending(totals, config.top_n);

        let keep = ranked.iter().fold(lit(false), |acc, g| {
            acc.or(col(columns.country.as_str()).eq(lit(g.label.as_str())))
        });
        let subset = window.clone().lazy().filter(keep).collect()?;

        info!(
            window_rows = window.height(),
            subset_rows = subset.height(),
            countries = ?ranked.iter().map(|g| g.label.as_str()).collect::<Vec<_>>(),
            "selected top countries"
        );

        Ok(TopCountries {
            ranked,
            window_rows: window.height(),
            subset,
        })
    }

    /// Summed death rate per age group, excluding the unknown label.
    pub fn age_group_totals(
        df: &DataFrame,
        columns: &ColumnMap,
        unknown_label: &str,
    ) -> Result<Vec<GroupTotal>, ProcessorError> {
        let known = df
            .clone()
            .lazy()
            .filter(col(columns.age_group.as_str()).neq(lit(unknown_label)))
            .collect()?;
        let totals = Self::sum_by_group(&known, &columns.age_group, &columns.death_rate)?;
        debug!(groups = totals.len(), "age group totals");
        Ok(totals)
    }

    /// Summed suicide count per sex for one year, sorted by sex, without the
    /// unknown label.
    pub fn sex_totals_for_year(
        df: &DataFrame,
        columns: &ColumnMap,
        year: i64,
        unknown_label: &str,
    ) -> Result<Vec<GroupTotal>, ProcessorError> {
        let in_year = df
            .clone()
            .lazy()
            .filter(col(columns.year.as_str()).eq(lit(year)))
            .collect()?;
        let mut totals = Self::sum_by_group(&in_year, &columns.sex, &columns.suicide_count)?;
        totals.retain(|g| g.label != unknown_label);
        totals.sort_by(|a, b| a.label.cmp(&b.label));
        debug!(year, groups = totals.len(), "sex totals");
        Ok(totals)
    }

    /// Mean death rate per (country, year), one series per country in the
    /// given order. Each series is sorted by year.
    pub fn yearly_means(
        df: &DataFrame,
        columns: &ColumnMap,
        countries: &[String],
    ) -> Result<Vec<CountrySeries>, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .filter(col(columns.country.as_str()).is_not_null())
            .group_by_stable([
                col(columns.country.as_str()).cast(DataType::String),
                col(columns.year.as_str()).cast(DataType::Int64),
            ])
            .agg([col(columns.death_rate.as_str())
                .cast(DataType::Float64)
                .mean()])
            .collect()?;

        let names = grouped.column(&columns.country)?.str()?;
        let years = grouped.column(&columns.year)?.i64()?;
        let means = grouped.column(&columns.death_rate)?.f64()?;

        let mut by_country: HashMap<&str, Vec<(i64, f64)>> = HashMap::new();
        for ((name, year), mean) in names.into_iter().zip(years).zip(means) {
            if let (Some(name), Some(year), Some(mean)) = (name, year, mean) {
                by_country.entry(name).or_default().push((year, mean));
            }
        }

        let series = countries
            .iter()
            .map(|country| {
                let mut points = by_country.remove(country.as_str()).unwrap_or_default();
                points.sort_by_key(|&(year, _)| year);
                CountrySeries {
                    country: country.clone(),
                    points,
                }
            })
            .collect();
        Ok(series)
    }
}
