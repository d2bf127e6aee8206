//! The seam to the inspection data service.
//!
//! The service itself (HTTP client, authentication, timeouts) lives outside
//! this crate. An [`InspectionSource`] is any blocking call that turns an
//! [`InspectionQuery`] into inspection records or fails.

use chrono::NaiveDate;

use crate::error::SpcError;
use crate::measurement::InspectionRecord;

/// Selection made by the user before an analysis is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectionQuery {
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
    pub material_code: String,
    pub operation_code: String,
    pub gauge_code: String,
    /// Shifts to include. Records from other shifts are discarded even if
    /// the source returns them.
    pub shift_codes: Vec<u32>,
}

impl InspectionQuery {
    /// Checks that every selection is present and the range is ordered.
    ///
    /// # Errors
    ///
    /// [`SpcError::MissingSelection`] naming the first empty field, or
    /// [`SpcError::InvalidDateRange`] when `from > to`.
    pub fn validate(&self) -> Result<(), SpcError> {
        if self.shift_codes.is_empty() {
            return Err(SpcError::MissingSelection("shift"));
        }
        let fields = [
            ("material", &self.material_code),
            ("operation", &self.operation_code),
            ("gauge", &self.gauge_code),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(SpcError::MissingSelection(*name));
        }
        if self.from > self.to {
            return Err(SpcError::InvalidDateRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    /// `true` if `shift_code` is one of the selected shifts.
    pub fn includes_shift(&self, shift_code: u32) -> bool {
        self.shift_codes.contains(&shift_code)
    }
}

/// Provider of inspection records.
pub trait InspectionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches all records matching `query`.
    fn fetch(&self, query: &InspectionQuery) -> Result<Vec<InspectionRecord>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> InspectionQuery {
        InspectionQuery {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            material_code: "MAT-100".to_string(),
            operation_code: "OP-20".to_string(),
            gauge_code: "G-07".to_string(),
            shift_codes: vec![1, 2],
        }
    }

    #[test]
    fn complete_query_is_valid() {
        assert!(query().validate().is_ok());
    }

    #[test]
    fn same_day_range_is_valid() {
        let mut q = query();
        q.to = q.from;
        assert!(q.validate().is_ok());
    }

    #[test]
    fn missing_fields_are_named() {
        let mut q = query();
        q.shift_codes.clear();
        assert!(matches!(q.validate(), Err(SpcError::MissingSelection("shift"))));

        let mut q = query();
        q.material_code = String::new();
        assert!(matches!(q.validate(), Err(SpcError::MissingSelection("material"))));

        let mut q = query();
        q.operation_code = "  ".to_string();
        assert!(matches!(q.validate(), Err(SpcError::MissingSelection("operation"))));

        let mut q = query();
        q.gauge_code = String::new();
        assert!(matches!(q.validate(), Err(SpcError::MissingSelection("gauge"))));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let mut q = query();
        std::mem::swap(&mut q.from, &mut q.to);
        assert!(matches!(q.validate(), Err(SpcError::InvalidDateRange { .. })));
    }

    #[test]
    fn shift_membership() {
        let q = query();
        assert!(q.includes_shift(2));
        assert!(!q.includes_shift(3));
    }
}
