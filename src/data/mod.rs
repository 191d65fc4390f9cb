//! Data module - FluNet loading, cleaning and aggregation

mod aggregator;
mod loader;

pub use aggregator::{AggregateError, Aggregator, PivotedTable, ViewDimension};
pub use loader::{
    DataLoader, COL_CASES, COL_PLACE, COL_REGION, COL_YEAR, DEFAULT_DATA_PATH,
};
