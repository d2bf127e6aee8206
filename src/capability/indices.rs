//! Process capability indices (Cp, Cpk, Pp, Ppk).
//!
//! Capability indices compare the specification width and centering to the
//! estimated process spread. Short-term indices use sigma-hat = R-bar / d2;
//! long-term indices use a pluggable [`SpreadEstimator`].
//!
//! Any index that comes out non-finite or larger than 1000 in magnitude is
//! replaced by [`SENTINEL`] (999.999), so results never carry NaN or
//! infinity.
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Kane (1986), "Process Capability Indices", *Journal of Quality Technology*
//!   18(1), pp. 41--52.

use serde::Serialize;

use super::spread::{floor_sigma, SpreadEstimator, SpreadInput, WithinSubgroupRange};
use crate::error::SpcError;
use crate::numeric::round4;

/// Value substituted for an index that overflows or is not finite.
pub const SENTINEL: f64 = 999.999;

/// Magnitude above which an index is replaced by [`SENTINEL`].
pub const CLAMP_THRESHOLD: f64 = 1000.0;

/// Conventional minimum for a capable process (Cp/Cpk >= 1.33).
pub const CAPABLE_THRESHOLD: f64 = 1.33;

/// Two-sided specification limits, `usl > lsl`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecLimits {
    lsl: f64,
    usl: f64,
}

impl SpecLimits {
    /// # Errors
    ///
    /// [`SpcError::InvalidSpecLimits`] if either limit is non-finite or
    /// `usl <= lsl`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::capability::SpecLimits;
    ///
    /// let spec = SpecLimits::new(9.0, 11.0).unwrap();
    /// assert!((spec.target() - 10.0).abs() < 1e-12);
    ///
    /// assert!(SpecLimits::new(6.0, 5.0).is_err());
    /// assert!(SpecLimits::new(5.0, 5.0).is_err());
    /// ```
    pub fn new(lsl: f64, usl: f64) -> Result<Self, SpcError> {
        if !lsl.is_finite() || !usl.is_finite() || usl <= lsl {
            return Err(SpcError::InvalidSpecLimits { lsl, usl });
        }
        Ok(Self { lsl, usl })
    }

    pub fn lsl(&self) -> f64 {
        self.lsl
    }

    pub fn usl(&self) -> f64 {
        self.usl
    }

    /// Midpoint of the specification.
    pub fn target(&self) -> f64 {
        (self.usl + self.lsl) / 2.0
    }
}

/// Capability and performance indices, rounded to 4 decimal places.
///
/// | Index | Value | Interpretation |
/// |-------|-------|----------------|
/// | Cp | >= 1.33 | Process is capable |
/// | Cpk | >= 1.33 | Process is capable and centered |
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityMetrics {
    /// Grand mean of the process.
    pub mean: f64,
    /// Short-term sigma-hat (R-bar / d2, floored at 1e-4).
    pub std_dev: f64,
    /// Sigma used for the Pp family.
    pub std_dev_overall: f64,
    /// Mean range (moving range for individuals).
    pub r_bar: f64,
    /// Cp = (USL - LSL) / (6 sigma).
    pub cp: f64,
    /// Cpu = (USL - mean) / (3 sigma).
    pub cpu: f64,
    /// Cpl = (mean - LSL) / (3 sigma).
    pub cpl: f64,
    /// Cpk = min(Cpu, Cpl).
    pub cpk: f64,
    pub pp: f64,
    pub ppu: f64,
    pub ppl: f64,
    pub ppk: f64,
    pub lsl: f64,
    pub usl: f64,
    /// Specification midpoint.
    pub target: f64,
}

impl CapabilityMetrics {
    /// Cp >= 1.33.
    pub fn is_capable(&self) -> bool {
        self.cp >= CAPABLE_THRESHOLD
    }

    /// Cpk >= 1.33.
    pub fn is_centered(&self) -> bool {
        self.cpk >= CAPABLE_THRESHOLD
    }

    /// Pp >= 1.33.
    pub fn is_performing(&self) -> bool {
        self.pp >= CAPABLE_THRESHOLD
    }

    /// Ppk >= 1.33.
    pub fn is_stable(&self) -> bool {
        self.ppk >= CAPABLE_THRESHOLD
    }
}

/// Computes capability indices against fixed specification limits.
///
/// # Examples
///
/// ```
/// use u_spc::capability::{ProcessCapability, SpecLimits, SpreadInput, WithinSubgroupRange};
///
/// let capability = ProcessCapability::new(SpecLimits::new(200.0, 220.0).unwrap());
/// // sigma-hat = R-bar / d2 = 4.652 / 2.326 = 2.0
/// let input = SpreadInput { r_bar: 4.652, d2: 2.326, values: &[] };
/// let m = capability.compute(210.0, &input, &WithinSubgroupRange);
///
/// assert!((m.cp - 1.6667).abs() < 1e-9);
/// assert!((m.cpk - m.cpu.min(m.cpl)).abs() < 1e-12);
/// assert_eq!(m.pp, m.cp);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProcessCapability {
    spec: SpecLimits,
}

impl ProcessCapability {
    pub fn new(spec: SpecLimits) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &SpecLimits {
        &self.spec
    }

    /// Computes all indices for a process centered at `mean`.
    ///
    /// Cp/Cpk use R-bar / d2, Pp/Ppk use `long_term`. Both sigmas are
    /// floored at 1e-4.
    pub fn compute(
        &self,
        mean: f64,
        input: &SpreadInput<'_>,
        long_term: &dyn SpreadEstimator,
    ) -> CapabilityMetrics {
        let sigma_within = floor_sigma(WithinSubgroupRange.estimate(input));
        let sigma_overall = floor_sigma(long_term.estimate(input));

        let short = self.indices(mean, sigma_within);
        let long = self.indices(mean, sigma_overall);

        CapabilityMetrics {
            mean: round4(mean),
            std_dev: round4(sigma_within),
            std_dev_overall: round4(sigma_overall),
            r_bar: round4(input.r_bar),
            cp: round4(short.whole),
            cpu: round4(short.upper),
            cpl: round4(short.lower),
            cpk: round4(short.min),
            pp: round4(long.whole),
            ppu: round4(long.upper),
            ppl: round4(long.lower),
            ppk: round4(long.min),
            lsl: round4(self.spec.lsl),
            usl: round4(self.spec.usl),
            target: round4(self.spec.target()),
        }
    }

    fn indices(&self, mean: f64, sigma: f64) -> IndexSet {
        let whole = clamp_index((self.spec.usl - self.spec.lsl) / (6.0 * sigma));
        let upper = clamp_index((self.spec.usl - mean) / (3.0 * sigma));
        let lower = clamp_index((mean - self.spec.lsl) / (3.0 * sigma));
        IndexSet {
            whole,
            upper,
            lower,
            min: upper.min(lower),
        }
    }
}

/// One family of indices (Cp or Pp) before rounding.
struct IndexSet {
    whole: f64,
    upper: f64,
    lower: f64,
    min: f64,
}

/// Replaces a non-finite or oversized index by [`SENTINEL`].
///
/// # Examples
///
/// ```
/// use u_spc::capability::clamp_index;
///
/// assert_eq!(clamp_index(1.5), 1.5);
/// assert_eq!(clamp_index(f64::INFINITY), 999.999);
/// assert_eq!(clamp_index(-2500.0), 999.999);
/// ```
pub fn clamp_index(value: f64) -> f64 {
    if !value.is_finite() || value.abs() > CLAMP_THRESHOLD {
        SENTINEL
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::OverallStdDev;

    fn within(r_bar: f64, d2: f64) -> SpreadInput<'static> {
        SpreadInput {
            r_bar,
            d2,
            values: &[],
        }
    }

    #[test]
    fn spec_limits_reject_inverted_and_non_finite() {
        assert!(matches!(
            SpecLimits::new(6.0, 5.0),
            Err(SpcError::InvalidSpecLimits { .. })
        ));
        assert!(SpecLimits::new(5.0, 5.0).is_err());
        assert!(SpecLimits::new(f64::NAN, 5.0).is_err());
        assert!(SpecLimits::new(0.0, f64::INFINITY).is_err());
        assert!(SpecLimits::new(-1.0, 1.0).is_ok());
    }

    /// LSL = 200, USL = 220, mean = 215, sigma = 2.0
    /// Cp = 20 / 12 = 1.6667, Cpu = 5 / 6 = 0.8333, Cpl = 15 / 6 = 2.5
    #[test]
    fn off_center_process() {
        let cap = ProcessCapability::new(SpecLimits::new(200.0, 220.0).unwrap());
        let m = cap.compute(215.0, &within(2.0 * 1.128, 1.128), &WithinSubgroupRange);

        assert!((m.std_dev - 2.0).abs() < 1e-9);
        assert!((m.cp - 1.6667).abs() < 1e-9);
        assert!((m.cpu - 0.8333).abs() < 1e-9);
        assert!((m.cpl - 2.5).abs() < 1e-9);
        assert!((m.cpk - m.cpu).abs() < 1e-12);
        assert!(m.is_capable());
        assert!(!m.is_centered());
    }

    #[test]
    fn pp_mirrors_cp_by_default() {
        let cap = ProcessCapability::new(SpecLimits::new(9.0, 11.0).unwrap());
        let m = cap.compute(10.1, &within(0.3, 1.128), &WithinSubgroupRange);
        assert_eq!(m.pp, m.cp);
        assert_eq!(m.ppu, m.cpu);
        assert_eq!(m.ppl, m.cpl);
        assert_eq!(m.ppk, m.cpk);
        assert_eq!(m.std_dev_overall, m.std_dev);
    }

    #[test]
    fn pp_uses_overall_estimator_when_asked() {
        let values = [205.0, 207.0, 210.0, 213.0, 215.0, 206.0, 208.0, 212.0, 214.0, 210.0];
        let cap = ProcessCapability::new(SpecLimits::new(200.0, 220.0).unwrap());
        let input = SpreadInput {
            r_bar: 1.5 * 1.128,
            d2: 1.128,
            values: &values,
        };
        let m = cap.compute(210.0, &input, &OverallStdDev);
        assert!(m.std_dev_overall > m.std_dev);
        assert!(m.pp < m.cp, "Pp ({}) should be < Cp ({})", m.pp, m.cp);
        // sigma-hat 1.5 gives Cp 2.22; overall sigma ~3.46 gives Pp ~0.96
        assert!(m.is_capable());
        assert!(!m.is_performing());
        assert!(!m.is_stable());
    }

    #[test]
    fn zero_spread_clamps_to_sentinel() {
        // sigma floors to 1e-4: Cp = 2 / 6e-4 = 3333 -> sentinel
        let cap = ProcessCapability::new(SpecLimits::new(9.0, 11.0).unwrap());
        let m = cap.compute(10.0, &within(0.0, 1.128), &WithinSubgroupRange);
        assert_eq!(m.cp, SENTINEL);
        assert_eq!(m.cpu, SENTINEL);
        assert_eq!(m.cpl, SENTINEL);
        assert_eq!(m.cpk, SENTINEL);
        assert!((m.std_dev - 1e-4).abs() < 1e-12);
    }

    #[test]
    fn negative_overflow_also_clamps() {
        // Mean far below LSL with tiny sigma: Cpl hugely negative.
        let cap = ProcessCapability::new(SpecLimits::new(9.0, 11.0).unwrap());
        let m = cap.compute(5.0, &within(0.001, 1.0), &WithinSubgroupRange);
        assert_eq!(m.cpl, SENTINEL);
        assert_eq!(m.cpk, m.cpu.min(m.cpl));
    }

    #[test]
    fn outputs_are_rounded() {
        let cap = ProcessCapability::new(SpecLimits::new(0.0, 10.0).unwrap());
        let m = cap.compute(5.123_456_7, &within(1.0, 1.0), &WithinSubgroupRange);
        assert!((m.mean - 5.1235).abs() < 1e-12);
        assert!((m.cp - 1.6667).abs() < 1e-12);
        assert!((m.target - 5.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_index_threshold() {
        assert_eq!(clamp_index(1000.0), 1000.0);
        assert_eq!(clamp_index(1000.000_1), SENTINEL);
        assert_eq!(clamp_index(f64::NAN), SENTINEL);
        assert_eq!(clamp_index(-3.2), -3.2);
    }
}
