//! CSV Data Loader Module
//! Reads the record table with Polars and checks the expected headers.

use crate::config::ColumnMap;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl DataLoader {
    pub fn new(infer_schema_length: usize) -> Self {
        Self {
            infer_schema_length,
        }
    }

    /// Load a CSV file and verify every mapped header is present.
    ///
    /// `Year` is read as an integer and every measure column as `Float64`,
    /// whatever the sampled rows suggest. Cells that still fail to parse are
    /// read as nulls.
    pub fn load_csv(&self, file_path: &Path, columns: &ColumnMap) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_dtype_overwrite(Some(Arc::new(Self::forced_schema(columns))))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::check_columns(&df, columns)?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded record table"
        );
        Ok(df)
    }

    fn forced_schema(columns: &ColumnMap) -> Schema {
        let measures = columns
            .measure_columns()
            .into_iter()
            .map(|name| (PlSmallStr::from_str(name), DataType::Float64));
        std::iter::once((PlSmallStr::from_str(&columns.year), DataType::Int64))
            .chain(measures)
            .collect()
    }

    fn check_columns(df: &DataFrame, columns: &ColumnMap) -> Result<(), LoaderError> {
        let present = Self::get_columns(df);
        for name in columns.all() {
            if !present.iter().any(|c| c == name) {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Get list of column names from a DataFrame.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names, in table order.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        let numeric: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect();
        debug!(?numeric, "numeric columns");
        numeric
    }
}
