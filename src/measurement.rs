//! Inspection records and measurement parsing.
//!
//! Records arrive from the inspection service as loosely typed JSON: dates
//! and numbers are strings. [`InspectionRecord`] mirrors that wire shape;
//! [`Measurement`] is the typed form the pipeline works on. Only the
//! timestamp is parsed eagerly, the measured value stays textual until the
//! subgroup builder parses it, so a bad value drops one record instead of
//! failing the whole batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date-time layouts accepted for `TrnDate`, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Date-only layouts; the time defaults to midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// A non-fatal problem with a single record. The record is dropped and the
/// analysis continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// The measured value is not a finite number.
    #[error("record {index}: invalid measurement value {raw:?}")]
    InvalidValue { index: usize, raw: String },
    /// The transaction date could not be parsed.
    #[error("record {index}: invalid transaction date {raw:?}")]
    InvalidTimestamp { index: usize, raw: String },
}

/// One row of inspection data as delivered by the inspection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectionRecord {
    /// Transaction date, textual.
    pub trn_date: String,
    pub shift_code: u32,
    #[serde(default)]
    pub shift_name: String,
    #[serde(rename = "GuageCode", default)]
    pub gauge_code: String,
    #[serde(rename = "GuageName", default)]
    pub gauge_name: String,
    /// Lower specification limit, textual.
    pub from_specification: String,
    /// Upper specification limit, textual.
    pub to_specification: String,
    /// Measured value, textual.
    pub actual_specification: String,
}

impl InspectionRecord {
    /// Converts the wire record into a [`Measurement`].
    ///
    /// `index` is the record's position in the fetched batch and is only
    /// used to label the warning.
    pub fn into_measurement(self, index: usize) -> Result<Measurement, ParseWarning> {
        let timestamp =
            parse_timestamp(&self.trn_date).ok_or_else(|| ParseWarning::InvalidTimestamp {
                index,
                raw: self.trn_date.clone(),
            })?;
        Ok(Measurement {
            timestamp,
            shift_code: self.shift_code,
            spec_lower: self.from_specification,
            spec_upper: self.to_specification,
            actual_value: self.actual_specification,
        })
    }
}

/// A single inspection measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    pub shift_code: u32,
    /// Lower specification limit as recorded, textual.
    pub spec_lower: String,
    /// Upper specification limit as recorded, textual.
    pub spec_upper: String,
    /// Measured value as recorded, textual.
    pub actual_value: String,
}

impl Measurement {
    pub fn new(
        timestamp: NaiveDateTime,
        shift_code: u32,
        spec_lower: impl Into<String>,
        spec_upper: impl Into<String>,
        actual_value: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            shift_code,
            spec_lower: spec_lower.into(),
            spec_upper: spec_upper.into(),
            actual_value: actual_value.into(),
        }
    }

    /// The measured value, or `None` if it is not a finite number.
    pub fn value(&self) -> Option<f64> {
        parse_number(&self.actual_value)
    }

    /// The recorded `(lsl, usl)` pair. Unparseable limits become NaN so the
    /// capability check rejects them.
    pub fn spec_limits(&self) -> (f64, f64) {
        (
            parse_number(&self.spec_lower).unwrap_or(f64::NAN),
            parse_number(&self.spec_upper).unwrap_or(f64::NAN),
        )
    }
}

/// Parses a finite number, ignoring surrounding whitespace.
///
/// # Examples
///
/// ```
/// use u_spc::measurement::parse_number;
///
/// assert_eq!(parse_number(" 10.25 "), Some(10.25));
/// assert_eq!(parse_number("n/a"), None);
/// assert_eq!(parse_number("inf"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a transaction date.
///
/// RFC 3339 timestamps are normalized to UTC. Naive date-times and plain
/// dates (midnight) are accepted as-is.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
