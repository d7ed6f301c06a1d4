//! Agreement window handling for hospital MOU date ranges
//!
//! MOU (Memorandum of Understanding) agreements carry an optional start
//! and end date. Expiry is tracked at day granularity against the current
//! calendar date; a configurable warning window flags agreements that are
//! about to lapse.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to agreement date handling
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid agreement window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

/// An optional MOU date range
///
/// Either boundary may be absent: agreements are frequently recorded
/// before the paperwork is finalized. A window with a missing boundary
/// never expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementWindow {
    /// Agreement start date (inclusive)
    pub start: Option<NaiveDate>,
    /// Agreement end date (inclusive)
    pub end: Option<NaiveDate>,
}

impl AgreementWindow {
    /// Creates a window, validating ordering when both dates are present
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(TemporalError::InvalidWindow { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    /// An empty window (no agreement dates recorded)
    pub fn open() -> Self {
        Self::default()
    }

    /// Returns true if both boundaries are recorded
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Returns true if the agreement has not yet taken effect
    pub fn starts_after(&self, today: NaiveDate) -> bool {
        self.start.is_some_and(|s| today < s)
    }

    /// Days remaining until the end date, negative once past it
    ///
    /// Returns None when no end date is recorded.
    pub fn days_until_end(&self, today: NaiveDate) -> Option<i64> {
        self.end.map(|e| (e - today).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_ordering_validated() {
        let result = AgreementWindow::new(Some(date(2026, 6, 1)), Some(date(2026, 1, 1)));
        assert!(matches!(result, Err(TemporalError::InvalidWindow { .. })));
    }

    #[test]
    fn test_partial_window_allowed() {
        let window = AgreementWindow::new(Some(date(2026, 1, 1)), None).unwrap();
        assert!(!window.is_complete());
        assert_eq!(window.days_until_end(date(2026, 3, 1)), None);
    }

    #[test]
    fn test_days_until_end() {
        let window =
            AgreementWindow::new(Some(date(2025, 1, 1)), Some(date(2026, 8, 31))).unwrap();

        assert_eq!(window.days_until_end(date(2026, 8, 21)), Some(10));
        assert_eq!(window.days_until_end(date(2026, 8, 31)), Some(0));
        assert_eq!(window.days_until_end(date(2026, 9, 1)), Some(-1));
    }

    #[test]
    fn test_starts_after() {
        let window =
            AgreementWindow::new(Some(date(2026, 9, 1)), Some(date(2027, 8, 31))).unwrap();

        assert!(window.starts_after(date(2026, 8, 23)));
        assert!(!window.starts_after(date(2026, 9, 1)));
    }
}
