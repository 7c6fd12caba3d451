use chrono::{Datelike, NaiveDate};

/// Short Portuguese weekday names, Sunday first.
///
/// Kept as a fixed table so labels never depend on the system locale.
pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

/// Label for a Sunday-based weekday ordinal (0 = Sunday ... 6 = Saturday).
pub fn weekday_label_for_ordinal(ordinal: usize) -> Option<&'static str> {
    WEEKDAY_LABELS.get(ordinal).copied()
}

/// Label for the weekday `date` falls on.
///
/// ```
/// use chrono::NaiveDate;
/// use lavras_clima::weekday_label;
///
/// // 2024-01-06 was a Saturday
/// assert_eq!(weekday_label(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()), "Sáb");
/// ```
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}
