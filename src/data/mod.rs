//! Data module - CSV loading, typed records and row selection

mod loader;
mod processor;
mod records;

pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use records::{
    percent, AggressionRow, Dataset, PlayerId, PlayerRecord, PowerRow, RadialMetric,
    RadialProfileRow, Table,
};
