//! Analysis configuration.
//!
//! ```toml
//! subgroup_size = 4
//! long_term_spread = "overall"
//! ```
//!
//! Every key is optional; missing keys take their defaults (individuals
//! chart, Pp mirroring Cp).

use serde::{Deserialize, Serialize};

use crate::capability::{OverallStdDev, SpreadEstimator, WithinSubgroupRange};
use crate::error::SpcError;
use crate::spc::ChartConstants;

/// Sigma estimate used for the Pp family of indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LongTermSpread {
    /// R-bar / d2, same as Cp. Pp, Ppu, Ppl and Ppk mirror the Cp family.
    #[default]
    Within,
    /// Sample standard deviation of all pooled values.
    Overall,
}

impl LongTermSpread {
    pub(crate) fn estimator(self) -> &'static dyn SpreadEstimator {
        match self {
            LongTermSpread::Within => &WithinSubgroupRange,
            LongTermSpread::Overall => &OverallStdDev,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Measurements per subgroup, 1..=5. 1 selects the I-MR chart.
    pub subgroup_size: usize,
    pub long_term_spread: LongTermSpread,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            subgroup_size: 1,
            long_term_spread: LongTermSpread::default(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration with the given subgroup size.
    pub fn with_subgroup_size(subgroup_size: usize) -> Self {
        Self {
            subgroup_size,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`SpcError::Config`] for malformed TOML or unknown keys,
    /// [`SpcError::UnsupportedSubgroupSize`] for a size outside 1..=5.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::config::{AnalysisConfig, LongTermSpread};
    ///
    /// let cfg = AnalysisConfig::from_toml_str("subgroup_size = 3").unwrap();
    /// assert_eq!(cfg.subgroup_size, 3);
    /// assert_eq!(cfg.long_term_spread, LongTermSpread::Within);
    ///
    /// assert!(AnalysisConfig::from_toml_str("subgroup_size = 9").is_err());
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, SpcError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the subgroup size against the chart constants table.
    pub fn validate(&self) -> Result<(), SpcError> {
        ChartConstants::for_size(self.subgroup_size).map(|_| ())
    }
}
