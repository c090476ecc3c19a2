pub mod aggregator;
pub mod schema;

pub use aggregator::{PatternSummary, StatsAggregator};
