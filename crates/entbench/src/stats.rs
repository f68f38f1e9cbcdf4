//! The individual ENT statistics.
//!
//! Every function borrows the sample sequence and recomputes whatever it needs
//! (range, histogram) from scratch. Malformed inputs are reported as
//! [`EntError`](crate::EntError); degenerate inputs come back as NaN or
//! infinity instead.

use crate::bins::{BinSpec, Bounds, Histogram};
use crate::distribution::{StatrsChiSquared, TailDistribution};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Chi-square
// ---------------------------------------------------------------------------

/// Sum of squared deviations from a flat expectation, divided by it.
fn pearson(counts: &[u64], expected: f64) -> f64 {
    let sum_sq: f64 = counts
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff
        })
        .sum();
    sum_sq / expected
}

/// Chi-square statistic as ENT reports it.
///
/// The expected count per bin is `N / (number of bin edges)`, i.e. one more
/// than the number of bins, so even a perfectly flat histogram scores above
/// zero. [`uniform_chi_square`] uses the bin count instead.
pub fn chi_square(data: &[f64], bins: &BinSpec, bounds: Bounds) -> Result<f64> {
    let hist = Histogram::compute(data, bins, bounds)?;
    let expected = data.len() as f64 / hist.edge_count() as f64;
    Ok(pearson(&hist.counts, expected))
}

/// Chi-square statistic against a uniform expectation of `N / bins` per bin.
///
/// This is the statistic whose tail [`chi_square_q`] reports.
pub fn uniform_chi_square(data: &[f64], bins: &BinSpec, bounds: Bounds) -> Result<f64> {
    let hist = Histogram::compute(data, bins, bounds)?;
    Ok(uniform_statistic(&hist, data.len()))
}

fn uniform_statistic(hist: &Histogram, n: usize) -> f64 {
    let expected = n as f64 / hist.bin_count() as f64;
    pearson(&hist.counts, expected)
}

/// Probability that a truly random source would exceed the observed
/// chi-square value, with `bins - 1` degrees of freedom.
///
/// Meaningless (NaN) with fewer than two bins.
pub fn chi_square_q(data: &[f64], bins: &BinSpec, bounds: Bounds) -> Result<f64> {
    chi_square_q_with(data, bins, bounds, &StatrsChiSquared)
}

/// [`chi_square_q`] with a caller-supplied distribution.
pub fn chi_square_q_with<D: TailDistribution>(
    data: &[f64],
    bins: &BinSpec,
    bounds: Bounds,
    dist: &D,
) -> Result<f64> {
    let hist = Histogram::compute(data, bins, bounds)?;
    let chi2 = uniform_statistic(&hist, data.len());
    let dof = hist.bin_count() as f64 - 1.0;
    Ok(dist.tail(chi2, dof))
}

// ---------------------------------------------------------------------------
// Entropy
// ---------------------------------------------------------------------------

/// Shannon entropy in bits per sample over the occupied bins.
///
/// At most `log2(bins)`. Zero when every sample lands in the same bin, and
/// also zero when no samples are given (every bin probability is 0/0 and is
/// dropped along with the empty bins).
pub fn shannon_entropy(data: &[f64], bins: &BinSpec, bounds: Bounds) -> Result<f64> {
    let hist = Histogram::compute(data, bins, bounds)?;
    let n = data.len() as f64;
    let mut h = 0.0;
    for &c in &hist.counts {
        let p = c as f64 / n;
        if p > 0.0 {
            h -= p * p.log2();
        }
    }
    Ok(h)
}

// ---------------------------------------------------------------------------
// Monte-Carlo pi
// ---------------------------------------------------------------------------

/// Estimate pi from consecutive samples taken as (x, y) points.
///
/// Points overlap: sample `i` is the x of point `i` and the y of point
/// `i - 1`, giving `N - 1` points. A point counts as a hit when it lies
/// strictly inside the circle inscribed in the range square. NaN for fewer
/// than two samples. The range is not checked, so infinite bounds simply
/// produce no hits.
pub fn estimate_pi(data: &[f64], bounds: Bounds) -> Result<f64> {
    let (min, max) = bounds.limits(data)?;
    let r = (max - min) / 2.0;
    let center = (max + min) / 2.0;
    let r2 = r * r;

    let points = data.len().saturating_sub(1);
    let hits = data
        .windows(2)
        .filter(|w| {
            let x = w[0] - center;
            let y = w[1] - center;
            x * x + y * y < r2
        })
        .count();
    Ok(4.0 * hits as f64 / points as f64)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Lag-1 serial correlation coefficient, `|r|` in `[0, 1]`.
///
/// Built from the 2x2 Pearson correlation matrix of the sequence against
/// itself shifted by one; the off-diagonal term is normalized by the diagonal.
/// NaN when the sequence is shorter than three samples or either half has
/// zero variance.
pub fn serial_correlation(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }
    let x = &data[..data.len() - 1];
    let y = &data[1..];
    let m = x.len() as f64;
    let mean_x = arithmetic_mean(x);
    let mean_y = arithmetic_mean(y);

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    // Sample covariances; the ddof cancels but keeps n = 2 undefined.
    let cov_xx = sxx / (m - 1.0);
    let cov_yy = syy / (m - 1.0);
    let cov_xy = sxy / (m - 1.0);
    let sd_x = cov_xx.sqrt();
    let sd_y = cov_yy.sqrt();

    let r00 = (cov_xx / sd_x / sd_x).clamp(-1.0, 1.0);
    let r01 = (cov_xy / sd_x / sd_y).clamp(-1.0, 1.0);
    (r01 / r00).abs()
}

/// Arithmetic mean of the samples; NaN when empty.
pub fn arithmetic_mean(data: &[f64]) -> f64 {
    pairwise_sum(data) / data.len() as f64
}

/// Sum in blocks of 128 with eight interleaved accumulators, splitting larger
/// inputs in half. Rounding error grows with `log n` instead of `n`.
fn pairwise_sum(a: &[f64]) -> f64 {
    const BLOCK: usize = 128;
    let n = a.len();
    if n < 8 {
        a.iter().fold(0.0, |acc, &v| acc + v)
    } else if n <= BLOCK {
        let mut r = [0.0f64; 8];
        r.copy_from_slice(&a[..8]);
        let tail = n - n % 8;
        for chunk in a[8..tail].chunks_exact(8) {
            for (acc, &v) in r.iter_mut().zip(chunk) {
                *acc += v;
            }
        }
        let mut res = ((r[0] + r[1]) + (r[2] + r[3])) + ((r[4] + r[5]) + (r[6] + r[7]));
        for &v in &a[tail..] {
            res += v;
        }
        res
    } else {
        let mut half = n / 2;
        half -= half % 8;
        pairwise_sum(&a[..half]) + pairwise_sum(&a[half..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntError;

    /// Generate pseudo-random data in [0, 1) for testing (simple LCG).
    fn pseudo_random(n: usize) -> Vec<f64> {
        let mut data = Vec::with_capacity(n);
        let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
        for _ in 0..n {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            data.push((state >> 11) as f64 / (1u64 << 53) as f64);
        }
        data
    }

    /// `per_bin` samples at the center of each of `bins` unit-wide bins.
    fn flat(bins: usize, per_bin: usize) -> Vec<f64> {
        (0..bins)
            .flat_map(|b| std::iter::repeat_n(b as f64 + 0.5, per_bin))
            .collect()
    }

    fn unit_bins(bins: usize) -> Bounds {
        Bounds::new(0.0, bins as f64)
    }

    #[test]
    fn test_chi_square_uses_edge_count() {
        // 4 bins x 10 samples: expected = 40 / 5 = 8 per bin.
        let data = flat(4, 10);
        let chi2 = chi_square(&data, &BinSpec::Count(4), unit_bins(4)).unwrap();
        // (4 * 2^2) / 8
        assert_eq!(chi2, 2.0);
    }

    #[test]
    fn test_uniform_chi_square_flat_histogram_is_zero() {
        let data = flat(8, 25);
        let chi2 = uniform_chi_square(&data, &BinSpec::Count(8), unit_bins(8)).unwrap();
        assert_eq!(chi2, 0.0);
        let q = chi_square_q(&data, &BinSpec::Count(8), unit_bins(8)).unwrap();
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_chi_square_q_detects_skew() {
        let mut data = flat(8, 100);
        data.extend(std::iter::repeat_n(0.5, 400));
        let q = chi_square_q(&data, &BinSpec::Count(8), unit_bins(8)).unwrap();
        assert!(q < 1e-6, "skewed data should be rejected, q={q}");
    }

    #[test]
    fn test_chi_square_q_single_bin_is_nan() {
        let q = chi_square_q(&[0.1, 0.2, 0.3], &BinSpec::Count(1), Bounds::auto()).unwrap();
        assert!(q.is_nan());
    }

    #[test]
    fn test_chi_square_q_with_custom_distribution() {
        struct Halfway;
        impl TailDistribution for Halfway {
            fn cdf(&self, _statistic: f64, _dof: f64) -> f64 {
                0.5
            }
        }
        let q = chi_square_q_with(&flat(4, 3), &BinSpec::Count(4), unit_bins(4), &Halfway);
        assert_eq!(q, Ok(0.5));
    }

    #[test]
    fn test_chi_square_empty_with_range_is_nan() {
        let chi2 = chi_square(&[], &BinSpec::Count(4), Bounds::new(0.0, 1.0)).unwrap();
        assert!(chi2.is_nan());
    }

    #[test]
    fn test_statistics_reject_empty_input() {
        let bins = BinSpec::Count(4);
        assert_eq!(chi_square(&[], &bins, Bounds::auto()), Err(EntError::EmptyInput));
        assert_eq!(chi_square_q(&[], &bins, Bounds::auto()), Err(EntError::EmptyInput));
        assert_eq!(shannon_entropy(&[], &bins, Bounds::auto()), Err(EntError::EmptyInput));
        assert_eq!(estimate_pi(&[], Bounds::auto()), Err(EntError::EmptyInput));
    }

    #[test]
    fn test_statistics_reject_bad_bins() {
        let data = [0.0, 1.0];
        assert_eq!(
            shannon_entropy(&data, &BinSpec::Count(0), Bounds::auto()),
            Err(EntError::ZeroBins)
        );
        assert_eq!(
            chi_square(&data, &BinSpec::from(vec![1.0, 0.0]), Bounds::auto()),
            Err(EntError::NonMonotonicEdges { index: 1 })
        );
    }

    #[test]
    fn test_entropy_constant_is_zero() {
        let data = vec![42.0; 1000];
        let h = shannon_entropy(&data, &BinSpec::Count(16), Bounds::auto()).unwrap();
        assert_eq!(h, 0.0);
    }

    #[test]
    fn test_entropy_flat_is_maximal() {
        let data = flat(16, 7);
        let h = shannon_entropy(&data, &BinSpec::Count(16), unit_bins(16)).unwrap();
        assert!((h - 4.0).abs() < 1e-12, "h={h}");
    }

    #[test]
    fn test_entropy_random_near_max() {
        let data = pseudo_random(100_000);
        let h = shannon_entropy(&data, &BinSpec::Count(256), Bounds::new(0.0, 1.0)).unwrap();
        assert!(h > 7.99 && h <= 8.0, "Shannon entropy out of range: {h}");
    }

    #[test]
    fn test_entropy_two_bins_half_split() {
        let data = [0.0, 0.0, 1.0, 1.0];
        let h = shannon_entropy(&data, &BinSpec::Count(2), Bounds::auto()).unwrap();
        assert_eq!(h, 1.0);
    }

    #[test]
    fn test_pi_corner_points_never_hit() {
        // Every point is a corner of the square, outside the circle.
        let data = [0.0, 2.0, 0.0, 2.0, 0.0, 2.0];
        let pi = estimate_pi(&data, Bounds::new(0.0, 2.0)).unwrap();
        assert_eq!(pi, 0.0);
    }

    #[test]
    fn test_pi_boundary_is_a_miss() {
        // Points: (0,0) (0,0) (0,-1) (-1,1); only the first two are strictly inside.
        let data = [1.0, 1.0, 1.0, 0.0, 2.0];
        let pi = estimate_pi(&data, Bounds::new(0.0, 2.0)).unwrap();
        assert_eq!(pi, 2.0);
    }

    #[test]
    fn test_pi_random_converges() {
        let data = pseudo_random(200_000);
        let pi = estimate_pi(&data, Bounds::new(0.0, 1.0)).unwrap();
        assert!(
            (pi - std::f64::consts::PI).abs() < 0.02,
            "pi estimate too far off: {pi}"
        );
    }

    #[test]
    fn test_no_samples_with_supplied_range() {
        let bounds = Bounds::new(0.0, 1.0);
        assert_eq!(shannon_entropy(&[], &BinSpec::Count(4), bounds), Ok(0.0));
        assert!(estimate_pi(&[], bounds).unwrap().is_nan());
        assert!(uniform_chi_square(&[], &BinSpec::Count(4), bounds).unwrap().is_nan());
    }

    #[test]
    fn test_infinite_sample_with_explicit_edges() {
        let data = [0.5, f64::INFINITY];
        let bins = BinSpec::from(vec![0.0, 1.0]);
        // The infinite sample falls outside the edges but still counts in N.
        assert_eq!(shannon_entropy(&data, &bins, Bounds::auto()), Ok(0.5));
        // E = 2 / 2 edges = 1, one bin holding 1 sample.
        assert_eq!(chi_square(&data, &bins, Bounds::auto()), Ok(0.0));
        // A single bin has no degrees of freedom.
        assert!(chi_square_q(&data, &bins, Bounds::auto()).unwrap().is_nan());
        assert_eq!(estimate_pi(&data, Bounds::auto()), Ok(0.0));
        // Equal-width bins still need a finite range.
        assert!(matches!(
            shannon_entropy(&data, &BinSpec::Count(2), Bounds::auto()),
            Err(EntError::NonFiniteRange { .. })
        ));
    }

    #[test]
    fn test_pi_accepts_inverted_range() {
        // R is negative but only R^2 matters.
        let data = [1.0, 1.0, 1.0];
        assert_eq!(estimate_pi(&data, Bounds::new(2.0, 0.0)), Ok(4.0));
    }

    #[test]
    fn test_pi_single_sample_is_nan() {
        assert!(estimate_pi(&[0.5], Bounds::new(0.0, 1.0)).unwrap().is_nan());
    }

    #[test]
    fn test_serial_correlation_alternating() {
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let r = serial_correlation(&data);
        assert!((r - 1.0).abs() < 1e-12, "r={r}");
    }

    #[test]
    fn test_serial_correlation_ramp() {
        let data: Vec<f64> = (0..50).map(f64::from).collect();
        assert!((serial_correlation(&data) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_serial_correlation_random_is_small() {
        let data = pseudo_random(50_000);
        let r = serial_correlation(&data);
        assert!(r < 0.02, "serial correlation too high: {r}");
    }

    #[test]
    fn test_serial_correlation_degenerate() {
        assert!(serial_correlation(&[]).is_nan());
        assert!(serial_correlation(&[1.0]).is_nan());
        assert!(serial_correlation(&[1.0, 2.0]).is_nan());
        assert!(serial_correlation(&[3.0; 10]).is_nan());
    }

    #[test]
    fn test_arithmetic_mean() {
        assert_eq!(arithmetic_mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
        assert!(arithmetic_mean(&[]).is_nan());
    }

    #[test]
    fn test_pairwise_sum_exact_on_integers() {
        for n in [0usize, 1, 7, 8, 9, 127, 128, 129, 1000, 4099] {
            let data: Vec<f64> = (1..=n).map(|i| i as f64).collect();
            assert_eq!(pairwise_sum(&data), (n * (n + 1) / 2) as f64, "n={n}");
        }
    }

    #[test]
    fn test_mean_drifts_less_than_naive_sum() {
        let data = vec![0.1; 100_000];
        let naive = data.iter().sum::<f64>() / data.len() as f64;
        let mean = arithmetic_mean(&data);
        assert!((mean - 0.1).abs() < 1e-15, "mean={mean}");
        assert!((mean - 0.1).abs() < (naive - 0.1).abs());
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let data = pseudo_random(5_000);
        let bins = BinSpec::Count(32);
        let a = shannon_entropy(&data, &bins, Bounds::auto()).unwrap();
        let b = shannon_entropy(&data, &bins, Bounds::auto()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        let a = chi_square(&data, &bins, Bounds::auto()).unwrap();
        let b = chi_square(&data, &bins, Bounds::auto()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        let a = estimate_pi(&data, Bounds::auto()).unwrap();
        let b = estimate_pi(&data, Bounds::auto()).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(
            serial_correlation(&data).to_bits(),
            serial_correlation(&data).to_bits()
        );
    }
}
