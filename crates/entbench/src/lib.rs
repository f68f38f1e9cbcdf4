//! # entbench
//!
//! ENT-style randomness benchmark for sequences of numeric samples.
//!
//! Computes the figures Fourmilab's ENT reports, generalized from bytes to any
//! `f64` samples over a value range:
//!
//! - Shannon entropy (bits per sample) over a histogram of the range
//! - chi-square goodness of fit against a flat histogram, and its tail
//!   probability
//! - a Monte-Carlo estimate of pi from consecutive samples taken as points
//! - the lag-1 serial correlation coefficient
//!
//! ## Quick Start
//!
//! ```
//! use entbench::{BinSpec, EntOptions, ent};
//!
//! let data: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 1000) as f64 / 1000.0).collect();
//! let report = ent(&data, &BinSpec::Count(16), &EntOptions::default()).unwrap();
//! let (entropy, _chi2, _pi, _corr) = report.summary();
//! assert!(entropy > 3.9);
//! ```
//!
//! Every function is pure. Value ranges default to the data's own minimum and
//! maximum; malformed inputs return an [`EntError`], while degenerate ones
//! (too few samples, fewer than two bins) yield NaN or infinite figures.

pub mod bins;
pub mod distribution;
pub mod error;
pub mod report;
pub mod stats;

pub use bins::{BinSpec, Bounds, Histogram, ValueRange};
pub use distribution::{StatrsChiSquared, TailDistribution};
pub use error::{EntError, Result};
pub use report::{EntOptions, EntReport, ent, ent_to, ent_with};
pub use stats::{
    arithmetic_mean, chi_square, chi_square_q, chi_square_q_with, estimate_pi, serial_correlation,
    shannon_entropy, uniform_chi_square,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
