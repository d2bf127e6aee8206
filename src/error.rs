//! Error types.
//!
//! [`SpcError`] covers every condition that aborts an analysis. Noisy input
//! values are not errors: they are reported as
//! [`ParseWarning`](crate::measurement::ParseWarning)s and the offending
//! record is dropped.

use chrono::NaiveDate;
use thiserror::Error;

/// Boxed error returned by a retrieval collaborator.
pub type RetrievalError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal analysis failures.
///
/// None of these are transient: retrying with the same input yields the same
/// failure. [`SpcError::Retrieval`] is kept separate so callers can tell
/// "could not fetch data" apart from "bad data".
#[derive(Debug, Error)]
pub enum SpcError {
    /// No records, or fewer records than one subgroup needs.
    #[error("not enough data points: {available} available, at least {required} required")]
    InsufficientData { available: usize, required: usize },

    /// Subgroup formation produced no complete subgroup.
    #[error("no complete subgroups of size {subgroup_size} could be formed from {records} records")]
    InsufficientSubgroups { records: usize, subgroup_size: usize },

    /// USL must be strictly greater than LSL, and both must be finite.
    #[error("invalid specification limits: USL ({usl}) must be greater than LSL ({lsl})")]
    InvalidSpecLimits { lsl: f64, usl: f64 },

    /// Subgroup size outside the chart constants table.
    #[error("unsupported subgroup size {0}, expected 1..=5")]
    UnsupportedSubgroupSize(usize),

    /// A required selection field is empty.
    #[error("missing selection: {0}")]
    MissingSelection(&'static str),

    /// The date range ends before it starts.
    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// The retrieval collaborator failed (network, timeout, decoding).
    #[error("failed to retrieve inspection data")]
    Retrieval(#[source] RetrievalError),

    /// Pooled values could not be binned (a value is not finite).
    #[error("cannot bin {count} values: not all values are finite")]
    NonFiniteValues { count: usize },

    /// Malformed configuration document.
    #[error("invalid configuration")]
    Config(#[from] toml::de::Error),
}
