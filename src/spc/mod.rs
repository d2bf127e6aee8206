//! Statistical Process Control (SPC) charts.
//!
//! X-bar-R charts for subgroup sizes 2..=5 and the Individuals / Moving
//! Range (I-MR) chart for n = 1.
//!
//! - [`ChartConstants`] — A2, D3, D4, d2 factors keyed by subgroup size
//! - [`build_subgroups`] — time-ordered subgroup formation
//! - [`compute_limits`] — center lines and control limits for both charts
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - ASTM E2587 — Standard Practice for Use of Control Charts

mod chart;
mod constants;
mod subgroup;

pub use chart::{chart_points, compute_limits, ChartLimits, ChartPoint, ControlLimits};
pub use constants::{ChartConstants, E2};
pub use subgroup::{build_subgroups, Subgroup, SubgroupSet};
