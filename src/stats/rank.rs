//! Percentile ranks against an empirical distribution.

use statrs::distribution::{ContinuousCDF, Empirical};

/// Empirical distribution of one metric column.
pub struct PercentileRanker {
    dist: Empirical,
    len: usize,
}

impl PercentileRanker {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let len = finite.len();
        Self {
            dist: finite.into_iter().collect(),
            len,
        }
    }

    /// Share of the column at or below `value`, in `[0, 1]`.
    pub fn rank(&self, value: f64) -> f64 {
        if self.len == 0 || !value.is_finite() {
            return 0.0;
        }
        self.dist.cdf(value).clamp(0.0, 1.0)
    }
}
