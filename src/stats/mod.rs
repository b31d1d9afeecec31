//! Statistics module - density estimation and percentile ranks

mod kde;
mod rank;

pub use kde::{silverman_bandwidth, Kde, KdeError, DEFAULT_POINTS};
pub use rank::PercentileRanker;
