//! Summary statistics over a [`HistoryTable`].

use crate::types::history_table::{DailyHistory, HistoryTable};
use crate::ClimaError;

/// Aggregates and superlative days of a non-empty history.
///
/// Missing (`NaN`) values are skipped by every statistic. Superlatives break
/// ties in favour of the chronologically first day.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStatistics {
    pub avg_temp_max: f64,
    pub avg_temp_min: f64,
    pub total_precipitation: f64,
    pub hottest_day: DailyHistory,
    pub coldest_day: DailyHistory,
    pub wettest_day: DailyHistory,
}

impl DerivedStatistics {
    /// Computes the statistics of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::EmptyStatisticsInput`] when the table has no rows,
    /// or when a column has no usable value to pick a superlative from.
    pub fn compute(table: &HistoryTable) -> Result<Self, ClimaError> {
        let rows = table.rows();
        if rows.is_empty() {
            return Err(ClimaError::EmptyStatisticsInput);
        }

        Ok(Self {
            avg_temp_max: mean(rows.iter().map(|r| r.temp_max_c)),
            avg_temp_min: mean(rows.iter().map(|r| r.temp_min_c)),
            total_precipitation: rows
                .iter()
                .map(|r| r.precipitation_mm)
                .filter(|v| !v.is_nan())
                .sum(),
            hottest_day: first_extreme(rows, |r| r.temp_max_c, |a, b| a > b)?,
            coldest_day: first_extreme(rows, |r| r.temp_min_c, |a, b| a < b)?,
            wettest_day: first_extreme(rows, |r| r.precipitation_mm, |a, b| a > b)?,
        })
    }
}

impl HistoryTable {
    pub fn statistics(&self) -> Result<DerivedStatistics, ClimaError> {
        DerivedStatistics::compute(self)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Row whose `key` beats every other under `better`; only strict wins replace
/// the current pick, so the earliest row keeps a tie.
fn first_extreme(
    rows: &[DailyHistory],
    key: impl Fn(&DailyHistory) -> f64,
    better: impl Fn(f64, f64) -> bool,
) -> Result<DailyHistory, ClimaError> {
    let mut best: Option<&DailyHistory> = None;
    for row in rows.iter().filter(|r| !key(*r).is_nan()) {
        match best {
            Some(current) if !better(key(row), key(current)) => {}
            _ => best = Some(row),
        }
    }
    best.cloned().ok_or(ClimaError::EmptyStatisticsInput)
}
