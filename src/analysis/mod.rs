//! End-to-end SPC analysis.
//!
//! Runs the pipeline stage by stage, each stage consuming the full output of
//! the previous one:
//!
//! 1. Look up chart constants for the subgroup size
//! 2. Check there is at least one subgroup's worth of records
//! 3. Form subgroups (dropping unparseable values)
//! 4. Compute mean and range chart limits
//! 5. Validate specification limits
//! 6. Compute capability indices
//! 7. Bin the pooled values into a spec-aware histogram
//!
//! Every call is computed fresh from its inputs; nothing is cached or shared
//! between calls.

mod retrieval;

pub use retrieval::{InspectionQuery, InspectionSource};

use log::{debug, info, warn};
use serde::Serialize;

use crate::capability::{CapabilityMetrics, ProcessCapability, SpecLimits, SpreadInput};
use crate::config::AnalysisConfig;
use crate::distribution::{spec_histogram, SpecHistogram};
use crate::error::SpcError;
use crate::measurement::Measurement;
use crate::spc::{build_subgroups, chart_points, compute_limits, ChartConstants, ChartLimits, ChartPoint};

/// Mean and range chart data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlChartData {
    pub subgroup_size: usize,
    /// Subgroup means (individual values for n = 1), one-based.
    pub mean_points: Vec<ChartPoint>,
    /// Subgroup ranges (moving ranges for n = 1), one-based.
    pub range_points: Vec<ChartPoint>,
    /// Limits rounded to 4 decimal places.
    pub limits: ChartLimits,
    /// The same limits before rounding.
    pub unrounded_limits: ChartLimits,
}

/// Everything a chart or report needs from one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub capability: CapabilityMetrics,
    pub control_chart: ControlChartData,
    pub histogram: SpecHistogram,
    /// Records dropped because their date or value could not be parsed.
    pub dropped_records: usize,
}

/// Runs analyses with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes `measurements` against `[spec_lower, spec_upper]`.
    ///
    /// # Errors
    ///
    /// - [`SpcError::UnsupportedSubgroupSize`] — configured size not in 1..=5
    /// - [`SpcError::InsufficientData`] — no records or fewer than one subgroup
    /// - [`SpcError::InsufficientSubgroups`] — no complete subgroup formed
    /// - [`SpcError::InvalidSpecLimits`] — `spec_upper <= spec_lower`
    pub fn analyze(
        &self,
        measurements: &[Measurement],
        spec_lower: f64,
        spec_upper: f64,
    ) -> Result<AnalysisResult, SpcError> {
        let n = self.config.subgroup_size;
        let constants = ChartConstants::for_size(n)?;

        if measurements.is_empty() || measurements.len() < n {
            return Err(SpcError::InsufficientData {
                available: measurements.len(),
                required: n,
            });
        }

        let set = build_subgroups(measurements, n)?;
        if set.is_empty() {
            return Err(SpcError::InsufficientSubgroups {
                records: measurements.len(),
                subgroup_size: n,
            });
        }

        let limits = compute_limits(&set, constants)?;
        let spec = SpecLimits::new(spec_lower, spec_upper)?;

        let pooled = set.pooled_values();
        let input = SpreadInput {
            r_bar: limits.r_bar,
            d2: constants.d2,
            values: &pooled,
        };
        let capability = ProcessCapability::new(spec).compute(
            limits.grand_mean,
            &input,
            self.config.long_term_spread.estimator(),
        );
        debug!(
            "capability: cp={} cpk={} pp={} ppk={}",
            capability.cp, capability.cpk, capability.pp, capability.ppk
        );

        let histogram = spec_histogram(&pooled, &spec).ok_or(SpcError::NonFiniteValues {
            count: pooled.len(),
        })?;

        let control_chart = ControlChartData {
            subgroup_size: n,
            mean_points: chart_points(&set.means(), &limits.mean_chart),
            range_points: chart_points(&set.ranges(), &limits.range_chart),
            limits: limits.rounded(),
            unrounded_limits: limits,
        };

        info!(
            "analyzed {} records into {} subgroups of size {n} ({} dropped)",
            measurements.len(),
            set.len(),
            set.warnings.len()
        );

        Ok(AnalysisResult {
            capability,
            control_chart,
            histogram,
            dropped_records: set.warnings.len(),
        })
    }

    /// Fetches records for `query` from `source` and analyzes them.
    ///
    /// Records outside the selected shifts are discarded. Specification
    /// limits are taken from the first remaining record.
    ///
    /// # Errors
    ///
    /// Everything [`Analyzer::analyze`] returns, plus
    /// [`SpcError::MissingSelection`] / [`SpcError::InvalidDateRange`] for an
    /// incomplete query and [`SpcError::Retrieval`] when the source fails.
    pub fn run<S>(&self, source: &S, query: &InspectionQuery) -> Result<AnalysisResult, SpcError>
    where
        S: InspectionSource + ?Sized,
    {
        query.validate()?;

        let records = source
            .fetch(query)
            .map_err(|e| SpcError::Retrieval(Box::new(e)))?;
        debug!("fetched {} inspection records", records.len());

        let mut dropped = 0;
        let measurements: Vec<Measurement> = records
            .into_iter()
            .enumerate()
            .filter(|(_, r)| query.includes_shift(r.shift_code))
            .filter_map(|(i, r)| match r.into_measurement(i) {
                Ok(m) => Some(m),
                Err(warning) => {
                    warn!("dropping inspection record: {warning}");
                    dropped += 1;
                    None
                }
            })
            .collect();

        let Some(first) = measurements.first() else {
            return Err(SpcError::InsufficientData {
                available: 0,
                required: self.config.subgroup_size,
            });
        };
        let (lsl, usl) = first.spec_limits();

        let mut result = self.analyze(&measurements, lsl, usl)?;
        result.dropped_records += dropped;
        Ok(result)
    }
}

/// Analyzes `measurements` with subgroup size `subgroup_size` and default
/// settings otherwise.
///
/// See [`Analyzer::analyze`] for the errors.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_spc::analysis::analyze;
/// use u_spc::measurement::Measurement;
/// use u_spc::SpcError;
///
/// let t0 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
/// let data: Vec<Measurement> = ["10.1", "9.9", "10.0", "10.2", "9.8", "10.0", "10.1"]
///     .iter()
///     .enumerate()
///     .map(|(i, v)| Measurement::new(t0 + chrono::Duration::minutes(i as i64), 1, "9", "11", *v))
///     .collect();
///
/// let result = analyze(&data, 9.0, 11.0, 4).unwrap();
/// assert_eq!(result.control_chart.mean_points.len(), 1);
///
/// let err = analyze(&data, 6.0, 5.0, 1).unwrap_err();
/// assert!(matches!(err, SpcError::InvalidSpecLimits { .. }));
/// ```
pub fn analyze(
    measurements: &[Measurement],
    spec_lower: f64,
    spec_upper: f64,
    subgroup_size: usize,
) -> Result<AnalysisResult, SpcError> {
    Analyzer::new(AnalysisConfig::with_subgroup_size(subgroup_size)).analyze(
        measurements,
        spec_lower,
        spec_upper,
    )
}
