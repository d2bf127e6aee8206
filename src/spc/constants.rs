//! Control chart factors for subgroup sizes 1 through 5.
//!
//! One immutable table shared by the control limit calculator and the
//! capability analyzer. Sizes above 5 are not supported.
//!
//! # References
//!
//! - ASTM E2587 — Standard Practice for Use of Control Charts
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Appendix Table VI.

use crate::error::SpcError;

/// Factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConstants {
    /// Subgroup size these factors apply to.
    pub n: usize,
    /// X-bar limit factor: CL +/- A2 * R-bar.
    pub a2: f64,
    /// R chart lower limit factor: LCL_R = D3 * R-bar.
    pub d3: f64,
    /// R chart upper limit factor: UCL_R = D4 * R-bar.
    pub d4: f64,
    /// Mean of the relative range; sigma-hat = R-bar / d2.
    pub d2: f64,
}

/// Individuals chart factor, E2 = 3 / d2(2).
///
/// Used for the n = 1 mean chart instead of the table's A2.
pub const E2: f64 = 2.66;

/// Index i holds the factors for n = i + 1.
///
/// n = 1 reuses the n = 2 range factors: the moving range spans two
/// consecutive observations.
#[rustfmt::skip]
static TABLE: [ChartConstants; 5] = [
    ChartConstants { n: 1, a2: 2.66, d3: 0.0, d4: 3.267, d2: 1.128 },
    ChartConstants { n: 2, a2: 1.88, d3: 0.0, d4: 3.267, d2: 1.128 },
    ChartConstants { n: 3, a2: 1.023, d3: 0.0, d4: 2.575, d2: 1.693 },
    ChartConstants { n: 4, a2: 0.729, d3: 0.0, d4: 2.282, d2: 2.059 },
    ChartConstants { n: 5, a2: 0.577, d3: 0.0, d4: 2.115, d2: 2.326 },
];

impl ChartConstants {
    /// Looks up the factors for subgroup size `n`.
    ///
    /// # Errors
    ///
    /// [`SpcError::UnsupportedSubgroupSize`] unless `n` is in `1..=5`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::spc::ChartConstants;
    ///
    /// let c = ChartConstants::for_size(5).unwrap();
    /// assert!((c.a2 - 0.577).abs() < 1e-12);
    /// assert!(ChartConstants::for_size(6).is_err());
    /// ```
    pub fn for_size(n: usize) -> Result<&'static ChartConstants, SpcError> {
        n.checked_sub(1)
            .and_then(|i| TABLE.get(i))
            .ok_or(SpcError::UnsupportedSubgroupSize(n))
    }

    /// Supported subgroup sizes.
    pub fn supported_sizes() -> impl Iterator<Item = usize> {
        TABLE.iter().map(|c| c.n)
    }
}
