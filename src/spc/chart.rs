//! Control limits and chart points for the mean and range charts.
//!
//! # Algorithm
//!
//! 1. Grand mean X-double-bar = mean of subgroup means.
//! 2. R-bar = mean of subgroup ranges, floored at 1e-4.
//! 3. Mean chart: CL = X-double-bar, UCL/LCL = CL +/- E2 * R-bar for n = 1,
//!    CL +/- A2 * R-bar otherwise.
//! 4. Range chart: CL = R-bar, UCL = D4 * R-bar, LCL = D3 * R-bar.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 6: Control Charts for Variables.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

use log::debug;
use serde::Serialize;
use u_numflow::stats;

use super::constants::{ChartConstants, E2};
use super::subgroup::SubgroupSet;
use crate::error::SpcError;
use crate::numeric::{round4, EPSILON};

/// Center line and control limits of one chart.
///
/// # Invariants
///
/// - `lower_limit <= chart_mean <= upper_limit`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlLimits {
    /// Center line.
    pub chart_mean: f64,
    /// Upper control limit.
    pub upper_limit: f64,
    /// Lower control limit.
    pub lower_limit: f64,
}

impl ControlLimits {
    /// Copy rounded to 4 decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            chart_mean: round4(self.chart_mean),
            upper_limit: round4(self.upper_limit),
            lower_limit: round4(self.lower_limit),
        }
    }

    /// `true` if `value` lies strictly outside the limits (Nelson rule 1).
    pub fn is_beyond(&self, value: f64) -> bool {
        value > self.upper_limit || value < self.lower_limit
    }
}

/// Limits for both charts plus the statistics they were derived from.
///
/// Values are unrounded; use [`ChartLimits::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartLimits {
    /// X-bar (or individuals) chart.
    pub mean_chart: ControlLimits,
    /// R (or moving range) chart.
    pub range_chart: ControlLimits,
    /// Grand mean of subgroup means.
    pub grand_mean: f64,
    /// Mean of subgroup ranges, floored at 1e-4.
    pub r_bar: f64,
}

impl ChartLimits {
    /// Copy with every value rounded to 4 decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            mean_chart: self.mean_chart.rounded(),
            range_chart: self.range_chart.rounded(),
            grand_mean: round4(self.grand_mean),
            r_bar: round4(self.r_bar),
        }
    }
}

/// A single plotted point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// One-based subgroup number.
    pub index: usize,
    /// Subgroup mean or range.
    pub value: f64,
    /// Point falls outside its chart's control limits.
    pub beyond_limits: bool,
}

/// Computes mean and range chart limits.
///
/// # Errors
///
/// [`SpcError::InsufficientSubgroups`] if `subgroups` is empty.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_spc::measurement::Measurement;
/// use u_spc::spc::{build_subgroups, compute_limits, ChartConstants};
///
/// let t0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let raw = ["45", "47", "50", "53", "55"];
/// let data: Vec<Measurement> = raw
///     .iter()
///     .enumerate()
///     .map(|(i, v)| Measurement::new(t0 + chrono::Duration::minutes(i as i64), 1, "40", "60", *v))
///     .collect();
///
/// let set = build_subgroups(&data, 5).unwrap();
/// let limits = compute_limits(&set, ChartConstants::for_size(5).unwrap()).unwrap();
/// // UCL = 50 + 0.577 * 10
/// assert!((limits.mean_chart.upper_limit - 55.77).abs() < 1e-9);
/// ```
pub fn compute_limits(
    subgroups: &SubgroupSet,
    constants: &ChartConstants,
) -> Result<ChartLimits, SpcError> {
    let insufficient = || SpcError::InsufficientSubgroups {
        records: subgroups.parsed_records,
        subgroup_size: constants.n,
    };
    let grand_mean = stats::mean(&subgroups.means()).ok_or_else(insufficient)?;
    let r_bar = stats::mean(&subgroups.ranges())
        .ok_or_else(insufficient)?
        .max(EPSILON);

    let factor = if constants.n == 1 { E2 } else { constants.a2 };
    let mean_chart = ControlLimits {
        chart_mean: grand_mean,
        upper_limit: grand_mean + factor * r_bar,
        lower_limit: grand_mean - factor * r_bar,
    };
    let range_chart = ControlLimits {
        chart_mean: r_bar,
        upper_limit: constants.d4 * r_bar,
        lower_limit: constants.d3 * r_bar,
    };

    debug!(
        "control limits n={}: X={grand_mean:.4} [{:.4}, {:.4}], R={r_bar:.4} [{:.4}, {:.4}]",
        constants.n,
        mean_chart.lower_limit,
        mean_chart.upper_limit,
        range_chart.lower_limit,
        range_chart.upper_limit
    );

    Ok(ChartLimits {
        mean_chart,
        range_chart,
        grand_mean,
        r_bar,
    })
}

/// Builds one-based chart points, flagging those beyond `limits`.
pub fn chart_points(values: &[f64], limits: &ControlLimits) -> Vec<ChartPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ChartPoint {
            index: i + 1,
            value: v,
            beyond_limits: limits.is_beyond(v),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Measurement;
    use crate::spc::subgroup::build_subgroups;
    use chrono::{Duration, NaiveDate};

    fn set_of(values: &[f64], n: usize) -> SubgroupSet {
        let t0 = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let data: Vec<Measurement> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Measurement::new(t0 + Duration::minutes(i as i64), 1, "0", "100", v.to_string()))
            .collect();
        build_subgroups(&data, n).unwrap()
    }

    #[test]
    fn xbar_r_basic_limits() {
        let values = [
            72.0, 84.0, 79.0, 49.0, 56.0, 87.0, 33.0, 42.0, 55.0, 73.0, 22.0, 60.0, 44.0, 80.0,
            54.0, 74.0, 97.0, 26.0, 48.0, 58.0,
        ];
        let set = set_of(&values, 4);
        let limits = compute_limits(&set, ChartConstants::for_size(4).unwrap()).unwrap();

        // Subgroup means: 71.0, 54.5, 52.5, 63.0, 57.25
        let expected_grand_mean = (71.0 + 54.5 + 52.5 + 63.0 + 57.25) / 5.0;
        assert!((limits.grand_mean - expected_grand_mean).abs() < 1e-9);
        // Ranges: 35, 54, 51, 36, 71
        let expected_r_bar = (35.0 + 54.0 + 51.0 + 36.0 + 71.0) / 5.0;
        assert!((limits.r_bar - expected_r_bar).abs() < 1e-9);

        let m = limits.mean_chart;
        assert!((m.upper_limit - (expected_grand_mean + 0.729 * expected_r_bar)).abs() < 1e-9);
        assert!(m.upper_limit > m.chart_mean && m.chart_mean > m.lower_limit);

        let r = limits.range_chart;
        assert!((r.upper_limit - 2.282 * expected_r_bar).abs() < 1e-9);
        assert!(r.lower_limit.abs() < f64::EPSILON);
    }

    #[test]
    fn individuals_use_e2() {
        // X-bar = 100, MR-bar = 10 (first point borrows MR_1)
        let set = set_of(&[95.0, 105.0], 1);
        let limits = compute_limits(&set, ChartConstants::for_size(1).unwrap()).unwrap();
        assert!((limits.grand_mean - 100.0).abs() < 1e-12);
        assert!((limits.r_bar - 10.0).abs() < 1e-12);
        assert!((limits.mean_chart.upper_limit - 126.6).abs() < 1e-9);
        assert!((limits.mean_chart.lower_limit - 73.4).abs() < 1e-9);
        assert!((limits.range_chart.upper_limit - 32.67).abs() < 1e-9);
    }

    #[test]
    fn identical_values_give_finite_limits() {
        let set = set_of(&[10.0; 6], 1);
        let limits = compute_limits(&set, ChartConstants::for_size(1).unwrap()).unwrap();
        assert!((limits.r_bar - EPSILON).abs() < f64::EPSILON);
        assert!(limits.mean_chart.upper_limit.is_finite());
        assert!(limits.mean_chart.upper_limit > limits.mean_chart.chart_mean);
        assert!(limits.mean_chart.chart_mean > limits.mean_chart.lower_limit);
    }

    #[test]
    fn empty_set_is_insufficient() {
        let set = SubgroupSet::default();
        assert!(matches!(
            compute_limits(&set, ChartConstants::for_size(3).unwrap()),
            Err(SpcError::InsufficientSubgroups { subgroup_size: 3, .. })
        ));
    }

    #[test]
    fn rounded_limits() {
        let limits = ControlLimits {
            chart_mean: 10.123_456,
            upper_limit: 12.000_04,
            lower_limit: 8.246_85,
        };
        let r = limits.rounded();
        assert!((r.chart_mean - 10.1235).abs() < 1e-12);
        assert!((r.upper_limit - 12.0).abs() < 1e-12);
        assert!((r.lower_limit - 8.2469).abs() < 1e-12);
    }

    #[test]
    fn points_are_one_based_and_flagged() {
        let limits = ControlLimits {
            chart_mean: 25.0,
            upper_limit: 30.0,
            lower_limit: 20.0,
        };
        let points = chart_points(&[25.0, 31.0, 19.0, 30.0], &limits);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].index, 1);
        assert_eq!(points[3].index, 4);
        let flagged: Vec<bool> = points.iter().map(|p| p.beyond_limits).collect();
        assert_eq!(flagged, vec![false, true, true, false]);
    }
}
