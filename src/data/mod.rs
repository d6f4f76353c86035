//! Data module - CSV loading, cleaning and aggregation

mod cleaner;
mod loader;
mod processor;

pub use cleaner::DataCleaner;
pub use loader::{DataLoader, LoaderError};
pub use processor::{CountrySeries, DataProcessor, GroupTotal, ProcessorError, TopCountries};
