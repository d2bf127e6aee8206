//! Subgroup formation.
//!
//! Turns unordered measurements into the time-ordered subgroups plotted on
//! a control chart.
//!
//! # Algorithm
//!
//! 1. Parse each measured value; unparseable records are dropped with a
//!    [`ParseWarning`].
//! 2. Stable-sort by timestamp, so equal timestamps keep their input order.
//! 3. n = 1: every value is its own subgroup, with the moving range
//!    |x_i - x_{i-1}| as its range. The first point borrows the second
//!    point's moving range (0 if there is none).
//! 4. n > 1: consecutive non-overlapping blocks of exactly n values. A
//!    trailing partial block is discarded. Block ranges are floored at 1e-4.

use log::{debug, warn};
use u_numflow::stats;

use crate::error::SpcError;
use crate::measurement::{Measurement, ParseWarning};
use crate::numeric::EPSILON;

/// One sampling unit on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgroup {
    /// Arithmetic mean of `values`.
    pub mean: f64,
    /// Block range (max - min), or the moving range for individuals.
    pub range: f64,
    /// Member values in time order.
    pub values: Vec<f64>,
}

impl Subgroup {
    /// An individual observation with its moving range.
    fn individual(value: f64, moving_range: f64) -> Self {
        Self {
            mean: value,
            range: moving_range,
            values: vec![value],
        }
    }

    /// A block of n > 1 values. `None` if the block is empty.
    fn from_block(values: &[f64]) -> Option<Self> {
        let mean = stats::mean(values)?;
        let range = stats::max(values)? - stats::min(values)?;
        Some(Self {
            mean,
            range: range.max(EPSILON),
            values: values.to_vec(),
        })
    }
}

/// Output of [`build_subgroups`].
#[derive(Debug, Clone, Default)]
pub struct SubgroupSet {
    /// Subgroups in time order.
    pub subgroups: Vec<Subgroup>,
    /// Records dropped while parsing.
    pub warnings: Vec<ParseWarning>,
    /// Records that parsed successfully.
    pub parsed_records: usize,
}

impl SubgroupSet {
    pub fn len(&self) -> usize {
        self.subgroups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgroups.is_empty()
    }

    /// Subgroup means in order.
    pub fn means(&self) -> Vec<f64> {
        self.subgroups.iter().map(|s| s.mean).collect()
    }

    /// Subgroup ranges in order.
    pub fn ranges(&self) -> Vec<f64> {
        self.subgroups.iter().map(|s| s.range).collect()
    }

    /// All member values of all subgroups, in order.
    ///
    /// Values from a discarded partial block are not included.
    pub fn pooled_values(&self) -> Vec<f64> {
        self.subgroups
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .collect()
    }
}

/// Forms subgroups of size `subgroup_size` from `measurements`.
///
/// An empty result is not an error here; the caller decides how to report
/// "not enough data".
///
/// # Errors
///
/// [`SpcError::UnsupportedSubgroupSize`] if `subgroup_size` is 0.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_spc::measurement::Measurement;
/// use u_spc::spc::build_subgroups;
///
/// let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let data: Vec<Measurement> = (0..7)
///     .map(|i| Measurement::new(t0 + chrono::Duration::minutes(i), 1, "0", "10", format!("{}", i)))
///     .collect();
///
/// let set = build_subgroups(&data, 4).unwrap();
/// assert_eq!(set.len(), 1); // 3 trailing records discarded
/// assert_eq!(set.subgroups[0].values, vec![0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn build_subgroups(
    measurements: &[Measurement],
    subgroup_size: usize,
) -> Result<SubgroupSet, SpcError> {
    if subgroup_size == 0 {
        return Err(SpcError::UnsupportedSubgroupSize(0));
    }

    let mut warnings = Vec::new();
    let mut timed = Vec::with_capacity(measurements.len());
    for (index, m) in measurements.iter().enumerate() {
        match m.value() {
            Some(v) => timed.push((m.timestamp, v)),
            None => {
                let warning = ParseWarning::InvalidValue {
                    index,
                    raw: m.actual_value.clone(),
                };
                warn!("dropping measurement: {warning}");
                warnings.push(warning);
            }
        }
    }

    // Stable: equal timestamps keep input order.
    timed.sort_by_key(|&(ts, _)| ts);
    let values: Vec<f64> = timed.into_iter().map(|(_, v)| v).collect();

    let subgroups = if subgroup_size == 1 {
        individuals(&values)
    } else {
        values
            .chunks_exact(subgroup_size)
            .filter_map(Subgroup::from_block)
            .collect()
    };

    debug!(
        "formed {} subgroups of size {subgroup_size} from {} records ({} dropped)",
        subgroups.len(),
        values.len(),
        warnings.len()
    );

    Ok(SubgroupSet {
        subgroups,
        warnings,
        parsed_records: values.len(),
    })
}

/// Individuals with moving ranges.
fn individuals(values: &[f64]) -> Vec<Subgroup> {
    let moving_ranges: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let mr = match i {
                0 => moving_ranges.first().copied().unwrap_or(0.0),
                _ => moving_ranges[i - 1],
            };
            Subgroup::individual(v, mr)
        })
        .collect()
}
