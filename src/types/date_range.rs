//! The user-selected period of the daily history.

use crate::ClimaError;
use chrono::{Days, NaiveDate};
use std::fmt;

/// Number of days before today covered by the default range.
pub const DEFAULT_HISTORY_DAYS: u64 = 30;

/// An inclusive range of calendar dates.
///
/// A `DateRange` can be built with `start > end`; such a range is *invalid*,
/// which is a recognized state and not a construction error. An invalid range
/// produces an empty history table and is never sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The last [`DEFAULT_HISTORY_DAYS`] days through `today`, inclusive.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use lavras_clima::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    /// let range = DateRange::ending_at(today);
    /// assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    /// assert_eq!(range.end, today);
    /// ```
    pub fn ending_at(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, today)
    }

    /// [`DateRange::ending_at`] the current local date.
    pub fn default_for_today() -> Self {
        Self::ending_at(chrono::Local::now().date_naive())
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn validate(&self) -> Result<(), ClimaError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ClimaError::InvalidDateRange {
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Number of calendar days in the range, counting both ends. Zero when invalid.
    pub fn num_days(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates over every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |day| *day <= end)
    }

    pub(crate) fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
