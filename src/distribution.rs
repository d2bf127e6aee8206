//! Specification-aware histogram.
//!
//! Bins the pooled subgroup values and classifies every bin against the
//! specification: inside [LSL, USL], containing the target (midpoint), or
//! neither.
//!
//! # Binning
//!
//! - bins = ⌈√n⌉ (square-root rule)
//! - width = (max − min) / bins, from the observed range only
//! - origin = min(observed min, LSL)
//!
//! Because the origin moves down to LSL while the width stays tied to the
//! observed range, a LSL well below the data shifts every value past the
//! last edge. Such values are clamped into the last bin and the leading bins
//! stay empty. Bin counts always add up to n.

use serde::Serialize;

use crate::capability::SpecLimits;
use crate::numeric::EPSILON;

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Bin midpoint.
    pub center_x: f64,
    /// Number of values assigned to the bin.
    pub count: usize,
    /// The whole bin lies within [LSL, USL].
    pub is_within_spec: bool,
    /// The specification midpoint falls within the bin.
    pub contains_target: bool,
}

/// Histogram bars plus the binning parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecHistogram {
    pub bins: Vec<HistogramBin>,
    /// Number of bins (= `bins.len()`).
    pub bin_count: usize,
    pub bin_width: f64,
    /// Left edge of the first bin.
    pub bin_start: f64,
    pub observed_min: f64,
    pub observed_max: f64,
    /// Observed max − min.
    pub process_width: f64,
    /// Specification midpoint.
    pub target: f64,
}

impl SpecHistogram {
    /// Sum of all bin counts.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Bins `values` against `spec`.
///
/// When all values are identical the observed range is zero; the bin width
/// is then floored at 1e-4.
///
/// # Returns
///
/// `None` if `values` is empty or contains non-finite values.
///
/// # Examples
///
/// ```
/// use u_spc::capability::SpecLimits;
/// use u_spc::distribution::spec_histogram;
///
/// let spec = SpecLimits::new(9.0, 11.0).unwrap();
/// let data = [9.2, 9.6, 9.9, 10.0, 10.1, 10.4, 10.8, 9.4, 10.6];
/// let h = spec_histogram(&data, &spec).unwrap();
///
/// assert_eq!(h.bin_count, 3);
/// assert_eq!(h.total(), data.len());
/// assert!(h.bins.iter().any(|b| b.contains_target));
/// ```
pub fn spec_histogram(values: &[f64], spec: &SpecLimits) -> Option<SpecHistogram> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let observed_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let observed_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let process_width = observed_max - observed_min;

    let bin_count = (values.len() as f64).sqrt().ceil() as usize;
    let bin_width = if process_width > 0.0 {
        process_width / bin_count as f64
    } else {
        EPSILON
    };
    let bin_start = observed_min.min(spec.lsl());
    let target = spec.target();

    let mut counts = vec![0_usize; bin_count];
    for &x in values {
        let bin = ((x - bin_start) / bin_width).floor().max(0.0) as usize;
        let bin = bin.min(bin_count - 1); // overflow lands in the last bin
        counts[bin] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = bin_start + i as f64 * bin_width;
            let hi = bin_start + (i + 1) as f64 * bin_width;
            HistogramBin {
                center_x: lo + bin_width / 2.0,
                count,
                is_within_spec: lo >= spec.lsl() && hi <= spec.usl(),
                contains_target: lo <= target && hi >= target,
            }
        })
        .collect();

    Some(SpecHistogram {
        bins,
        bin_count,
        bin_width,
        bin_start,
        observed_min,
        observed_max,
        process_width,
        target,
    })
}
