//! Statistics Calculator Module
//! Handles descriptive statistics and Pearson correlation over numeric columns.

use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Square matrix of pairwise Pearson coefficients.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` pairs `columns[i]` with `columns[j]`.
    pub values: Vec<Vec<f64>>,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            column: String::new(),
            count: n,
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Column values as `f64`, with nulls and NaN both reported as `None`.
    pub fn column_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        let as_f64 = df.column(column)?.cast(&DataType::Float64)?;
        let values = as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Describe every listed column, in the order given.
    pub fn describe(df: &DataFrame, columns: &[String]) -> PolarsResult<Vec<ColumnSummary>> {
        let extracted = columns
            .iter()
            .map(|name| Self::column_values(df, name).map(|v| (name, v)))
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(extracted
            .par_iter()
            .map(|(name, values)| {
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                let mut summary = Self::compute_descriptive_stats(&present);
                summary.column = name.to_string();
                summary
            })
            .collect())
    }

    /// Pearson coefficient over the positions where both inputs are present.
    ///
    /// NaN when fewer than two pairs remain or either side has zero variance.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let (x, y): (Vec<f64>, Vec<f64>) = xs
            .iter()
            .zip(ys)
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();
        if x.len() < 2 {
            return f64::NAN;
        }

        let cov = x.iter().covariance(y.iter());
        let denom = x.iter().std_dev() * y.iter().std_dev();
        if denom == 0.0 || denom.is_nan() {
            return f64::NAN;
        }
        (cov / denom).clamp(-1.0, 1.0)
    }

    /// Pairwise correlation matrix for the listed columns.
    pub fn correlation_matrix(
        df: &DataFrame,
        columns: &[String],
    ) -> PolarsResult<CorrelationMatrix> {
        let data = columns
            .iter()
            .map(|name| Self::column_values(df, name))
            .collect::<PolarsResult<Vec<_>>>()?;

        let values: Vec<Vec<f64>> = (0..data.len())
            .into_par_iter()
            .map(|i| {
                (0..data.len())
                    .map(|j| Self::pearson(&data[i], &data[j]))
                    .collect::<Vec<f64>>()
            })
            .collect();

        Ok(CorrelationMatrix {
            columns: columns.to_vec(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefficient(m: &CorrelationMatrix, row: &str, col: &str) -> Option<f64> {
        let i = m.columns.iter().position(|c| c == row)?;
        let j = m.columns.iter().position(|c| c == col)?;
        Some(m.values[i][j])
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn descriptive_stats_match_pandas_describe() {
        let s = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!(approx(s.mean, 2.5));
        assert!(approx(s.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(s.min, 1.0);
        assert!(approx(s.q25, 1.75));
        assert!(approx(s.median, 2.5));
        assert!(approx(s.q75, 3.25));
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn count_ignores_missing_values() {
        let df = df!(
            "SuicideCount" => [Some(1.0), None, Some(3.0), Some(f64::NAN)],
            "Year" => [2015i64, 2016, 2017, 2018]
        )
        .unwrap();
        let summary =
            StatsCalculator::describe(&df, &["SuicideCount".to_string(), "Year".to_string()])
                .unwrap();
        assert_eq!(summary[0].column, "SuicideCount");
        assert_eq!(summary[0].count, 2);
        assert!(approx(summary[0].mean, 2.0));
        assert_eq!(summary[1].count, 4);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0)];
        let down = [Some(3.0), Some(2.0), Some(1.0)];
        assert!(approx(StatsCalculator::pearson(&x, &up), 1.0));
        assert!(approx(StatsCalculator::pearson(&x, &down), -1.0));
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let x = [Some(1.0), None, Some(2.0), Some(3.0)];
        let y = [Some(1.0), Some(100.0), Some(2.0), Some(3.0)];
        assert!(approx(StatsCalculator::pearson(&x, &y), 1.0));
    }

    #[test]
    fn pearson_constant_column_is_nan() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let flat = [Some(5.0), Some(5.0), Some(5.0)];
        assert!(StatsCalculator::pearson(&x, &flat).is_nan());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let df = df!(
            "DeathRatePer100K" => [1.0, 2.0, 4.0, 3.0],
            "GDP" => [10.0, 8.0, 3.0, 5.0],
            "Population" => [1.0, 3.0, 2.0, 4.0]
        )
        .unwrap();
        let cols: Vec<String> = ["DeathRatePer100K", "GDP", "Population"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let m = StatsCalculator::correlation_matrix(&df, &cols).unwrap();
        for i in 0..3 {
            assert!(approx(m.values[i][i], 1.0));
            for j in 0..3 {
                assert!(approx(m.values[i][j], m.values[j][i]));
            }
        }
        assert!(coefficient(&m, "DeathRatePer100K", "GDP").unwrap() < -0.9);
    }
}
