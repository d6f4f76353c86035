//! Data Cleaner Module
//! Exact-duplicate row removal.

use polars::prelude::*;
use tracing::info;

/// Removes rows that repeat an earlier row across every column.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop exact duplicates in place, keeping the first occurrence and the
    /// original row order. Returns the number of rows removed.
    pub fn drop_duplicates(df: &mut DataFrame) -> PolarsResult<usize> {
        let before = df.height();
        let deduped = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        let removed = before - deduped.height();
        *df = deduped;

        info!(before, removed, "dropped duplicate rows");
        Ok(removed)
    }
}
