//! # u-spc
//!
//! Statistical process control (SPC) for inspection measurements: subgroup
//! formation, X̄-R / I-MR control limits, process capability indices and a
//! specification-aware histogram.
//!
//! The crate takes raw inspection records (timestamp, shift, spec limits,
//! measured value as text), and produces a single [`analysis::AnalysisResult`]
//! holding everything a chart or report needs. Fetching records and
//! rendering them are left to the caller.
//!
//! ## Modules
//!
//! - [`measurement`] — Inspection records and value parsing
//! - [`spc`] — Chart constants, subgroup builder, control limits
//! - [`capability`] — Process capability indices (Cp, Cpk, Pp, Ppk)
//! - [`distribution`] — Spec-aware histogram binning
//! - [`analysis`] — The end-to-end pipeline and the retrieval seam
//! - [`config`] — Analysis configuration (TOML)
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use u_spc::analysis::analyze;
//! use u_spc::measurement::Measurement;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let values = ["10.0", "10.2", "9.8", "10.1", "9.9", "10.3", "9.7", "10.0"];
//! let measurements: Vec<Measurement> = values
//!     .iter()
//!     .enumerate()
//!     .map(|(i, v)| {
//!         let ts = day.and_hms_opt(8, i as u32, 0).unwrap();
//!         Measurement::new(ts, 1, "9.0", "11.0", *v)
//!     })
//!     .collect();
//!
//! let result = analyze(&measurements, 9.0, 11.0, 1).unwrap();
//! assert_eq!(result.control_chart.mean_points.len(), 8);
//! assert!(result.capability.cp > 1.0);
//! ```

pub mod analysis;
pub mod capability;
pub mod config;
pub mod distribution;
pub mod error;
pub mod measurement;
pub mod spc;

mod numeric;

pub use error::SpcError;
