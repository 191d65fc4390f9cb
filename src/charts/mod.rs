//! Charts module - Chart rendering

mod area;

pub use area::{AreaChart, ChartData, ChartSeries};
