//! The full ENT benchmark: every statistic at once, plus the derived figures
//! and the classic text report.

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use std::io::Write;

use crate::bins::{BinSpec, Bounds};
use crate::distribution::{StatrsChiSquared, TailDistribution};
use crate::error::Result;
use crate::stats;

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Options for [`ent`]. Defaults: range taken from the data, no report printed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EntOptions {
    pub bounds: Bounds,
    /// Write the text report to stdout (or the writer given to [`ent_to`]).
    pub display: bool,
}

impl EntOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }
}

/// Everything [`ent`] computes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntReport {
    pub sample_count: usize,
    /// Bin count, or the number of edges when explicit edges were given.
    pub num_bins: usize,
    /// Range lower bound, as supplied or derived. Not checked, so it may be
    /// infinite when explicit edges are used.
    pub min_value: f64,
    pub max_value: f64,
    /// Bits per sample.
    pub entropy: f64,
    /// `log2(num_bins)`.
    pub max_entropy: f64,
    /// Size reduction an optimal compressor could achieve, in percent.
    pub compression_percent: f64,
    pub chi_square: f64,
    /// Upper-tail probability of `chi_square` with `num_bins - 1` dof.
    pub chi_square_q: f64,
    pub mean: f64,
    /// Midpoint of the value range, not the sample median.
    pub median: f64,
    pub pi: f64,
    pub pi_error_percent: f64,
    pub correlation: f64,
}

impl EntReport {
    /// `(entropy, chi_square, pi, correlation)`.
    pub fn summary(&self) -> (f64, f64, f64, f64) {
        (self.entropy, self.chi_square, self.pi, self.correlation)
    }

    /// Write the text report to `w`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        write!(w, "{self}")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EntReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Entropy =  {} bits per character.",
            float_repr(self.entropy)
        )?;
        writeln!(
            f,
            "Optimum compression would reduce the size of this data by {} percent.",
            fixed(self.compression_percent, 0)
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Chi square distribution is {}, and randomly would exceed this value {} percent of the times.",
            sci(self.chi_square, 2),
            fixed(self.chi_square_q * 100.0, 1)
        )?;
        writeln!(f)?;
        writeln!(f, "Arithmetic mean value is {}", sci(self.mean, 2))?;
        writeln!(f, "Median value is {}", sci(self.median, 2))?;
        writeln!(f)?;
        writeln!(
            f,
            "Monte-Carlo value for Pi is  {}  (error {} percent)",
            float_repr(self.pi),
            fixed(self.pi_error_percent, 3)
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Serial correlation coefficient is  {}",
            float_repr(self.correlation)
        )
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

fn non_finite(x: f64) -> Option<&'static str> {
    if x.is_nan() {
        Some("nan")
    } else if x == f64::INFINITY {
        Some("inf")
    } else if x == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

/// Rewrite Rust's `1.5e-5` exponent as `1.5e-05`.
fn pad_exponent(s: &str) -> String {
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s.to_string(),
    }
}

/// Scientific notation with `prec` mantissa decimals, e.g. `1.23e+02`.
fn sci(x: f64, prec: usize) -> String {
    match non_finite(x) {
        Some(s) => s.to_string(),
        None => pad_exponent(&format!("{x:.prec$e}")),
    }
}

/// Fixed-point with `prec` decimals.
fn fixed(x: f64, prec: usize) -> String {
    match non_finite(x) {
        Some(s) => s.to_string(),
        None => format!("{x:.prec$}"),
    }
}

/// Shortest round-trip representation: plain decimals with a trailing `.0`
/// for integral values, scientific outside `[1e-4, 1e16)`.
fn float_repr(x: f64) -> String {
    if let Some(s) = non_finite(x) {
        return s.to_string();
    }
    let abs = x.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        return pad_exponent(&format!("{x:e}"));
    }
    let s = format!("{x}");
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

// ---------------------------------------------------------------------------
// Benchmark
// ---------------------------------------------------------------------------

/// Run the whole benchmark on `data`.
///
/// Only the bin layout (and, for equal-width bins, the range) is validated:
/// degenerate inputs produce NaN or infinite figures. When `options.display`
/// is set the text report is printed to stdout; the returned report is the
/// same either way.
pub fn ent(data: &[f64], bins: &BinSpec, options: &EntOptions) -> Result<EntReport> {
    run(data, bins, options, &StatrsChiSquared, &mut std::io::stdout())
}

/// [`ent`] writing the text report, if any, to `out` instead of stdout.
pub fn ent_to<W: Write>(
    data: &[f64],
    bins: &BinSpec,
    options: &EntOptions,
    out: &mut W,
) -> Result<EntReport> {
    run(data, bins, options, &StatrsChiSquared, out)
}

/// [`ent`] with a caller-supplied chi-square distribution.
pub fn ent_with<D: TailDistribution>(
    data: &[f64],
    bins: &BinSpec,
    options: &EntOptions,
    dist: &D,
) -> Result<EntReport> {
    run(data, bins, options, dist, &mut std::io::stdout())
}

fn run<D: TailDistribution, W: Write>(
    data: &[f64],
    bins: &BinSpec,
    options: &EntOptions,
    dist: &D,
    out: &mut W,
) -> Result<EntReport> {
    let (min_value, max_value) = options.bounds.limits(data)?;
    let bounds = Bounds::new(min_value, max_value);
    let num_bins = bins.spec_len();
    log::debug!(
        "ent: {} samples, {} bins over [{}, {}]",
        data.len(),
        num_bins,
        min_value,
        max_value
    );

    let entropy = stats::shannon_entropy(data, bins, bounds)?;
    let max_entropy = (num_bins as f64).log2();
    let compression_percent = (max_entropy - entropy) * 100.0 / max_entropy;

    let chi_square = stats::chi_square(data, bins, bounds)?;
    let chi_square_q = dist.tail(chi_square, num_bins as f64 - 1.0);

    let mean = stats::arithmetic_mean(data);
    let median = (min_value + max_value) / 2.0;

    let pi = stats::estimate_pi(data, bounds)?;
    let pi_error_percent = (PI - pi).abs() * 100.0 / PI;

    let correlation = stats::serial_correlation(data);

    let report = EntReport {
        sample_count: data.len(),
        num_bins,
        min_value,
        max_value,
        entropy,
        max_entropy,
        compression_percent,
        chi_square,
        chi_square_q,
        mean,
        median,
        pi,
        pi_error_percent,
        correlation,
    };
    log::debug!(
        "ent: entropy={entropy:.6} chi2={chi_square:.4} pi={pi:.6} corr={correlation:.6}"
    );

    if options.display {
        report.write_to(out)?;
    }
    Ok(report)
}
