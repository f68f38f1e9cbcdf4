//! Chi-square cumulative distribution behind a small trait so the statistics
//! do not depend on a particular numerics crate.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Cumulative distribution of a chi-square statistic.
pub trait TailDistribution {
    /// `P(X <= statistic)` for a chi-square variable with `dof` degrees of
    /// freedom. Returns NaN when `dof` does not describe a valid distribution.
    fn cdf(&self, statistic: f64, dof: f64) -> f64;

    /// Upper-tail probability, `1 - cdf`.
    fn tail(&self, statistic: f64, dof: f64) -> f64 {
        1.0 - self.cdf(statistic, dof)
    }
}

/// [`TailDistribution`] backed by `statrs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsChiSquared;

impl TailDistribution for StatrsChiSquared {
    fn cdf(&self, statistic: f64, dof: f64) -> f64 {
        if statistic.is_nan() {
            return f64::NAN;
        }
        match ChiSquared::new(dof) {
            Ok(dist) => dist.cdf(statistic),
            // dof <= 0 (fewer than two bins) has no distribution.
            Err(_) => f64::NAN,
        }
    }
}
