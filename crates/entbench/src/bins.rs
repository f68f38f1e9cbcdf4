//! Value ranges and histogram binning shared by the histogram-based statistics.
//!
//! Binning follows the usual numeric-library histogram conventions: every bin
//! is right-open except the last, which also includes its upper edge. Samples
//! outside the range (or outside explicit edges) are silently dropped.

use crate::error::{EntError, Result};

// ---------------------------------------------------------------------------
// Bin specification
// ---------------------------------------------------------------------------

/// How to partition the value range into bins.
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// This many equal-width bins spanning the value range.
    Count(usize),
    /// Explicit edges, non-decreasing. `n` edges make `n - 1` bins and the
    /// value range is ignored when histogramming.
    Edges(Vec<f64>),
}

impl BinSpec {
    /// Number of bins the histogram will have.
    pub fn bin_count(&self) -> usize {
        match self {
            BinSpec::Count(n) => *n,
            BinSpec::Edges(edges) => edges.len().saturating_sub(1),
        }
    }

    /// Length of the bin specification itself: the count, or the number of
    /// edges supplied.
    pub fn spec_len(&self) -> usize {
        match self {
            BinSpec::Count(n) => *n,
            BinSpec::Edges(edges) => edges.len(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            BinSpec::Count(0) => Err(EntError::ZeroBins),
            BinSpec::Count(n) => match n.checked_add(1) {
                Some(_) => Ok(()),
                None => Err(EntError::TooManyBins { count: *n }),
            },
            BinSpec::Edges(edges) => {
                if edges.is_empty() {
                    return Err(EntError::EmptyEdges);
                }
                if let Some(index) = edges.iter().position(|e| !e.is_finite()) {
                    return Err(EntError::NonFiniteEdge { index });
                }
                match edges.windows(2).position(|w| w[1] < w[0]) {
                    Some(i) => Err(EntError::NonMonotonicEdges { index: i + 1 }),
                    None => Ok(()),
                }
            }
        }
    }
}

impl From<usize> for BinSpec {
    fn from(n: usize) -> Self {
        BinSpec::Count(n)
    }
}

impl From<Vec<f64>> for BinSpec {
    fn from(edges: Vec<f64>) -> Self {
        BinSpec::Edges(edges)
    }
}

// ---------------------------------------------------------------------------
// Value range
// ---------------------------------------------------------------------------

/// Optional value range. Missing bounds are taken from the data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Derive both bounds from the data.
    pub fn auto() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Fill in missing bounds from `data` without checking them.
    ///
    /// NaN samples are ignored when deriving bounds, so the result may be
    /// infinite, inverted, or anything the caller supplied. Deriving a bound
    /// from an empty sequence is an [`EntError::EmptyInput`].
    pub fn limits(&self, data: &[f64]) -> Result<(f64, f64)> {
        let min = match self.min {
            Some(v) => v,
            None => {
                if data.is_empty() {
                    return Err(EntError::EmptyInput);
                }
                data.iter().copied().fold(f64::INFINITY, f64::min)
            }
        };
        let max = match self.max {
            Some(v) => v,
            None => {
                if data.is_empty() {
                    return Err(EntError::EmptyInput);
                }
                data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            }
        };
        Ok((min, max))
    }

    /// [`limits`](Self::limits), then require a finite range with
    /// `min <= max`.
    pub fn resolve(&self, data: &[f64]) -> Result<ValueRange> {
        let (min, max) = self.limits(data)?;
        let range = ValueRange::new(min, max)?;
        log::debug!("resolved value range [{}, {}]", range.min, range.max);
        Ok(range)
    }
}

/// A resolved, finite value range with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EntError::NonFiniteRange { min, max });
        }
        if min > max {
            return Err(EntError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Per-bin counts and the edges that produced them.
///
/// `edges.len() == counts.len() + 1`, except for a single explicit edge,
/// which yields no bins at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Bin `data` according to `bins`.
    ///
    /// Equal-width bins need a finite, ordered range. Explicit edges ignore
    /// `bounds`, but an empty sequence with missing bounds is still an error.
    pub fn compute(data: &[f64], bins: &BinSpec, bounds: Bounds) -> Result<Self> {
        bins.validate()?;
        let hist = match bins {
            BinSpec::Count(n) => equal_width(data, *n, bounds.resolve(data)?)?,
            BinSpec::Edges(edges) => {
                bounds.limits(data)?;
                explicit_edges(data, edges)
            }
        };
        log::trace!(
            "histogram: {} bins, {} of {} samples binned",
            hist.bin_count(),
            hist.total(),
            data.len()
        );
        Ok(hist)
    }

    /// Samples that landed inside the bins.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// `n + 1` edges spaced like a linspace, last edge pinned to `last`.
fn linspace(first: f64, last: f64, n: usize) -> Result<Vec<f64>> {
    let mut edges = Vec::new();
    edges
        .try_reserve_exact(n + 1)
        .map_err(|_| EntError::TooManyBins { count: n })?;
    let step = (last - first) / n as f64;
    edges.extend((0..=n).map(|i| i as f64 * step + first));
    edges[n] = last;
    Ok(edges)
}

fn equal_width(data: &[f64], n: usize, range: ValueRange) -> Result<Histogram> {
    let (mut first, mut last) = (range.min, range.max);
    if first == last {
        first -= 0.5;
        last += 0.5;
    }
    let mut counts: Vec<u64> = Vec::new();
    counts
        .try_reserve_exact(n)
        .map_err(|_| EntError::TooManyBins { count: n })?;
    counts.resize(n, 0);
    let edges = linspace(first, last, n)?;
    let norm = n as f64 / (last - first);

    for &x in data {
        // NaN fails both comparisons.
        if !(x >= first && x <= last) {
            continue;
        }
        let mut idx = (((x - first) * norm) as usize).min(n - 1);
        // The arithmetic index can be off by one where it meets an edge.
        if x < edges[idx] {
            idx = idx.saturating_sub(1);
        } else if idx != n - 1 && x >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += 1;
    }

    Ok(Histogram { counts, edges })
}

fn explicit_edges(data: &[f64], edges: &[f64]) -> Histogram {
    let n = edges.len().saturating_sub(1);
    let mut counts = vec![0u64; n];
    if n > 0 {
        let (first, last) = (edges[0], edges[n]);
        for &x in data {
            if !(x >= first && x <= last) {
                continue;
            }
            let idx = if x == last {
                n - 1
            } else {
                edges.partition_point(|&e| e <= x) - 1
            };
            counts[idx] += 1;
        }
    }
    Histogram {
        counts,
        edges: edges.to_vec(),
    }
}
