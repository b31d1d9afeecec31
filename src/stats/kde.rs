//! Kernel Density Estimator Module
//! Gaussian kernel density estimate sampled on a padded, evenly spaced grid.

use rayon::prelude::*;
use statrs::statistics::Statistics;
use thiserror::Error;

/// Default number of evaluation points.
pub const DEFAULT_POINTS: usize = 500;

/// Silverman's rule of thumb constant.
const SILVERMAN_FACTOR: f64 = 1.06;

/// Fraction of the sample range added on each side of the evaluation domain.
const DOMAIN_PADDING: f64 = 0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdeError {
    #[error("cannot estimate a density from an empty sample")]
    EmptySample,
    #[error("sample contains a non-finite value at index {0}")]
    NonFiniteSample(usize),
    #[error("bandwidth is zero: sample has no variance")]
    DegenerateBandwidth,
    #[error("bandwidth must be positive and finite, got {0}")]
    InvalidBandwidth(f64),
    #[error("at least one evaluation point is required")]
    NoEvaluationPoints,
}

/// A sampled density curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Kde {
    pub xs: Vec<f64>,
    pub densities: Vec<f64>,
    pub bandwidth: f64,
}

impl Kde {
    /// Estimate with the default point count and Silverman bandwidth.
    pub fn estimate(sample: &[f64]) -> Result<Self, KdeError> {
        Self::estimate_with(sample, DEFAULT_POINTS, None)
    }

    /// Estimate the density of `sample` at `num_points` evenly spaced points.
    ///
    /// The domain is `[min - range / 2, max + range / 2]`. When `bandwidth`
    /// is `None` it is chosen by Silverman's rule from the population
    /// standard deviation. A zero-variance sample is rejected rather than
    /// producing a flat curve.
    pub fn estimate_with(
        sample: &[f64],
        num_points: usize,
        bandwidth: Option<f64>,
    ) -> Result<Self, KdeError> {
        if sample.is_empty() {
            return Err(KdeError::EmptySample);
        }
        if let Some(idx) = sample.iter().position(|v| !v.is_finite()) {
            return Err(KdeError::NonFiniteSample(idx));
        }
        if num_points == 0 {
            return Err(KdeError::NoEvaluationPoints);
        }

        // Both the bandwidth and the kernel sums run over the sorted sample,
        // so any permutation of the input produces bitwise identical output.
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);

        let bandwidth = match bandwidth {
            Some(h) if h.is_finite() && h > 0.0 => h,
            Some(h) => return Err(KdeError::InvalidBandwidth(h)),
            None => silverman_bandwidth(&sorted)?,
        };

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let range = max - min;
        let xs = linspace(
            min - DOMAIN_PADDING * range,
            max + DOMAIN_PADDING * range,
            num_points,
        );

        let norm = sorted.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
        let densities: Vec<f64> = xs
            .par_iter()
            .map(|&x| {
                let sum: f64 = sorted
                    .iter()
                    .map(|&p| {
                        let u = (x - p) / bandwidth;
                        (-0.5 * u * u).exp()
                    })
                    .sum();
                sum / norm
            })
            .collect();

        Ok(Self {
            xs,
            densities,
            bandwidth,
        })
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Evaluation domain as `(start, end)`.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.xs.first().copied().unwrap_or(f64::NAN),
            self.xs.last().copied().unwrap_or(f64::NAN),
        )
    }

    pub fn max_density(&self) -> f64 {
        self.densities.iter().copied().fold(0.0, f64::max)
    }

    /// Trapezoid-rule integral of the curve over its domain.
    pub fn integral(&self) -> f64 {
        self.xs
            .windows(2)
            .zip(self.densities.windows(2))
            .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
            .sum()
    }

    /// `(x, density)` pairs.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.xs
            .iter()
            .zip(self.densities.iter())
            .map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// Silverman's rule: `1.06 * std * n^(-1/5)`.
pub fn silverman_bandwidth(sample: &[f64]) -> Result<f64, KdeError> {
    if sample.is_empty() {
        return Err(KdeError::EmptySample);
    }
    let std = sample.iter().population_std_dev();
    let bandwidth = SILVERMAN_FACTOR * std * (sample.len() as f64).powf(-0.2);
    if bandwidth > 0.0 && bandwidth.is_finite() {
        Ok(bandwidth)
    } else {
        Err(KdeError::DegenerateBandwidth)
    }
}

/// Evenly spaced values over `[start, end]`, endpoints included.
fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread_sample() -> Vec<f64> {
        vec![
            0.412, 0.388, 0.455, 0.501, 0.367, 0.429, 0.398, 0.476, 0.352, 0.441, 0.389, 0.512,
            0.433, 0.405, 0.468,
        ]
    }

    #[test]
    fn output_length_matches_requested_points() {
        for n in [1, 2, 5, 500] {
            let kde = Kde::estimate_with(&spread_sample(), n, None).unwrap();
            assert_eq!(kde.xs.len(), n);
            assert_eq!(kde.densities.len(), n);
        }
    }

    #[test]
    fn densities_are_non_negative() {
        let kde = Kde::estimate(&spread_sample()).unwrap();
        assert!(kde.densities.iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn curve_integrates_to_about_one() {
        let sample: Vec<f64> = (0..=20).map(f64::from).collect();
        let kde = Kde::estimate(&sample).unwrap();
        assert!((kde.integral() - 1.0).abs() < 0.03, "{}", kde.integral());

        let kde = Kde::estimate(&spread_sample()).unwrap();
        assert!((kde.integral() - 1.0).abs() < 0.03, "{}", kde.integral());
    }

    #[test]
    fn permutation_gives_identical_output() {
        let sample = spread_sample();
        let mut reversed = sample.clone();
        reversed.reverse();
        let mut rotated = sample.clone();
        rotated.rotate_left(4);

        let base = Kde::estimate(&sample).unwrap();
        assert_eq!(base, Kde::estimate(&reversed).unwrap());
        assert_eq!(base, Kde::estimate(&rotated).unwrap());
    }

    #[test]
    fn bandwidth_is_independent_of_input_order() {
        // Long, badly ordered sample: running std-dev sums drift with order.
        let sample: Vec<f64> = (0..400)
            .map(|i| ((i * 7919) % 401) as f64 * 0.137 + 80.0 + (i % 3) as f64 * 1e-7)
            .collect();
        let mut rotated = sample.clone();
        rotated.rotate_left(157);
        let mut interleaved: Vec<f64> = sample.iter().step_by(2).copied().collect();
        interleaved.extend(sample.iter().skip(1).step_by(2).copied());

        let base = Kde::estimate(&sample).unwrap();
        for other in [rotated, interleaved] {
            let kde = Kde::estimate(&other).unwrap();
            assert_eq!(base.bandwidth.to_bits(), kde.bandwidth.to_bits());
            assert_eq!(base.xs, kde.xs);
            assert_eq!(base.densities, kde.densities);
        }
    }

    #[test]
    fn two_point_domain_contains_padding() {
        let kde = Kde::estimate_with(&[2.0, 6.0], 101, None).unwrap();
        let (start, end) = kde.domain();
        assert!(start < 2.0 && end > 6.0);
        assert!((start - 0.0).abs() < 1e-12);
        assert!((end - 8.0).abs() < 1e-12);
    }

    #[test]
    fn explicit_bandwidth_example() {
        let kde = Kde::estimate_with(&[1.0, 2.0, 3.0], 5, Some(0.5)).unwrap();
        assert_eq!(kde.xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(kde.bandwidth, 0.5);

        let d = &kde.densities;
        // Peak at the cluster centre, decreasing into both padded tails.
        assert!(d[2] > d[1] && d[1] > d[0]);
        assert!(d[2] > d[3] && d[3] > d[4]);
        assert!((d[0] - d[4]).abs() < 1e-15);
    }

    #[test]
    fn silverman_uses_population_std() {
        let sample = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // population std of this sample is exactly 2
        let expected = 1.06 * 2.0 * 8f64.powf(-0.2);
        let h = silverman_bandwidth(&sample).unwrap();
        assert!((h - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert_eq!(Kde::estimate(&[]), Err(KdeError::EmptySample));
        assert_eq!(
            Kde::estimate(&[3.0, 3.0, 3.0]),
            Err(KdeError::DegenerateBandwidth)
        );
        assert_eq!(Kde::estimate(&[3.0]), Err(KdeError::DegenerateBandwidth));
        assert_eq!(
            Kde::estimate(&[1.0, f64::NAN]),
            Err(KdeError::NonFiniteSample(1))
        );
        assert_eq!(
            Kde::estimate_with(&[1.0, 2.0], 10, Some(0.0)),
            Err(KdeError::InvalidBandwidth(0.0))
        );
        assert_eq!(
            Kde::estimate_with(&[1.0, 2.0], 0, None),
            Err(KdeError::NoEvaluationPoints)
        );
    }

    #[test]
    fn zero_variance_allowed_with_explicit_bandwidth() {
        let kde = Kde::estimate_with(&[3.0, 3.0], 4, Some(1.0)).unwrap();
        assert!(kde.xs.iter().all(|&x| x == 3.0));
        assert!(kde.max_density() > 0.0);
    }
}
