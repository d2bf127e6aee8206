//! Process capability analysis.
//!
//! Computes standard capability indices for assessing how well a process
//! meets two-sided specification limits.
//!
//! # Indices
//!
//! - **Cp** — Potential capability (spread vs tolerance)
//! - **Cpk** — Actual capability (centering considered)
//! - **Pp**, **Ppk** — Long-term performance indices
//!
//! # Spread estimation
//!
//! - [`WithinSubgroupRange`] — R-bar / d2 (default for both families)
//! - [`OverallStdDev`] — sample standard deviation of pooled values
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.

mod indices;
mod spread;

pub use indices::{
    clamp_index, CapabilityMetrics, ProcessCapability, SpecLimits, CAPABLE_THRESHOLD,
    CLAMP_THRESHOLD, SENTINEL,
};
pub use spread::{OverallStdDev, SpreadEstimator, SpreadInput, WithinSubgroupRange};
