//! Text tables for the summary printed to standard output.

use super::{ColumnSummary, CorrelationMatrix};
use std::fmt;

const MIN_WIDTH: usize = 12;

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v != 0.0 && (v.abs() >= 1e7 || v.abs() < 1e-4) {
        format!("{:.6e}", v)
    } else {
        format!("{:.6}", v)
    }
}

fn column_width(name: &str, cells: &[String]) -> usize {
    cells
        .iter()
        .map(String::len)
        .chain(std::iter::once(name.len()))
        .fold(MIN_WIDTH, usize::max)
}

/// Column-per-statistic layout in the style of a dataframe `describe()`.
pub struct DescribeTable<'a>(pub &'a [ColumnSummary]);

impl DescribeTable<'_> {
    const ROWS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    fn cells(s: &ColumnSummary) -> Vec<String> {
        vec![
            format!("{:.1}", s.count as f64),
            fmt_value(s.mean),
            fmt_value(s.std),
            fmt_value(s.min),
            fmt_value(s.q25),
            fmt_value(s.median),
            fmt_value(s.q75),
            fmt_value(s.max),
        ]
    }
}

impl fmt::Display for DescribeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<Vec<String>> = self.0.iter().map(Self::cells).collect();
        let widths: Vec<usize> = self
            .0
            .iter()
            .zip(&cells)
            .map(|(s, c)| column_width(&s.column, c))
            .collect();

        write!(f, "{:<6}", "")?;
        for (s, w) in self.0.iter().zip(&widths) {
            write!(f, "  {:>w$}", s.column, w = *w)?;
        }
        writeln!(f)?;

        for (row, label) in Self::ROWS.iter().enumerate() {
            write!(f, "{:<6}", label)?;
            for (c, w) in cells.iter().zip(&widths) {
                write!(f, "  {:>w$}", c[row], w = *w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Square correlation matrix with row and column headers.
pub struct CorrelationTable<'a>(pub &'a CorrelationMatrix);

impl fmt::Display for CorrelationTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        let label_w = m.columns.iter().map(String::len).fold(0, usize::max);
        let widths: Vec<usize> = m.columns.iter().map(|c| c.len().max(MIN_WIDTH)).collect();

        write!(f, "{:<label_w$}", "", label_w = label_w)?;
        for (c, w) in m.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c, w = *w)?;
        }
        writeln!(f)?;

        for (name, row) in m.columns.iter().zip(&m.values) {
            write!(f, "{:<label_w$}", name, label_w = label_w)?;
            for (v, w) in row.iter().zip(&widths) {
                write!(f, "  {:>w$}", fmt_value(*v), w = *w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsCalculator;

    #[test]
    fn describe_table_lists_every_statistic() {
        let mut s = StatsCalculator::compute_descriptive_stats(&[1.0, 2.0, 3.0]);
        s.column = "Year".to_string();
        let text = DescribeTable(&[s]).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].contains("Year"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].contains("3.0"));
        assert!(lines[8].starts_with("max"));
    }

    #[test]
    fn correlation_table_prints_nan() {
        let m = CorrelationMatrix {
            columns: vec!["GDP".to_string(), "Population".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        };
        let text = CorrelationTable(&m).to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("NaN"));
        assert!(text.contains("1.000000"));
    }

    #[test]
    fn large_values_use_exponent_form() {
        assert_eq!(fmt_value(12345678.0), "1.234568e7");
        assert_eq!(fmt_value(0.5), "0.500000");
    }
}
