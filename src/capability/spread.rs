//! Process spread (sigma) estimators.
//!
//! Short-term indices (Cp, Cpk) always use the within-subgroup estimate
//! R-bar / d2. Long-term indices (Pp, Ppk) take any [`SpreadEstimator`];
//! with [`WithinSubgroupRange`] they mirror Cp/Cpk exactly.

use u_numflow::stats;

use crate::numeric::EPSILON;

/// Data a spread estimator may draw on.
#[derive(Debug, Clone, Copy)]
pub struct SpreadInput<'a> {
    /// Mean of subgroup (or moving) ranges.
    pub r_bar: f64,
    /// d2 factor for the subgroup size.
    pub d2: f64,
    /// Pooled member values of all subgroups.
    pub values: &'a [f64],
}

/// Estimates process standard deviation.
pub trait SpreadEstimator {
    /// Raw sigma estimate. May be zero or non-finite; callers floor it.
    fn estimate(&self, input: &SpreadInput<'_>) -> f64;
}

/// sigma-hat = R-bar / d2.
#[derive(Debug, Clone, Copy, Default)]
pub struct WithinSubgroupRange;

impl SpreadEstimator for WithinSubgroupRange {
    fn estimate(&self, input: &SpreadInput<'_>) -> f64 {
        input.r_bar / input.d2
    }
}

/// Sample standard deviation of the pooled values.
///
/// Falls back to R-bar / d2 with fewer than two values.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverallStdDev;

impl SpreadEstimator for OverallStdDev {
    fn estimate(&self, input: &SpreadInput<'_>) -> f64 {
        stats::std_dev(input.values).unwrap_or_else(|| WithinSubgroupRange.estimate(input))
    }
}

/// Floors a sigma estimate at 1e-4. NaN also maps to the floor.
pub(crate) fn floor_sigma(sigma: f64) -> f64 {
    sigma.max(EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_is_r_bar_over_d2() {
        let input = SpreadInput {
            r_bar: 2.326,
            d2: 2.326,
            values: &[],
        };
        assert!((WithinSubgroupRange.estimate(&input) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overall_uses_sample_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let input = SpreadInput {
            r_bar: 1.0,
            d2: 1.128,
            values: &values,
        };
        assert!((OverallStdDev.estimate(&input) - 2.138_089_935_299_395).abs() < 1e-9);
    }

    #[test]
    fn overall_falls_back_for_single_value() {
        let input = SpreadInput {
            r_bar: 1.128,
            d2: 1.128,
            values: &[3.0],
        };
        assert!((OverallStdDev.estimate(&input) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn floor_handles_zero_and_nan() {
        assert!((floor_sigma(0.0) - EPSILON).abs() < f64::EPSILON);
        assert!((floor_sigma(-1.0) - EPSILON).abs() < f64::EPSILON);
        assert!((floor_sigma(f64::NAN) - EPSILON).abs() < f64::EPSILON);
        assert!((floor_sigma(0.5) - 0.5).abs() < f64::EPSILON);
    }
}
