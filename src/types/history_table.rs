//! Contains the `HistoryTable`, the daily archive shaped for the dashboard.

use crate::types::date_range::DateRange;
use crate::types::variables::{HistoryVariable, LongRow};
use crate::weather_data::error::FetchError;
use crate::weather_data::responses::ArchiveResponse;
use chrono::NaiveDate;
use log::warn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single day of observed weather.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyHistory {
    pub date: NaiveDate,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub precipitation_mm: f64,
}

impl DailyHistory {
    pub fn value(&self, variable: HistoryVariable) -> f64 {
        match variable {
            HistoryVariable::TempMax => self.temp_max_c,
            HistoryVariable::TempMin => self.temp_min_c,
            HistoryVariable::Precipitation => self.precipitation_mm,
        }
    }
}

/// Daily history rows in ascending date order.
///
/// An empty table is what an invalid [`DateRange`] produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    rows: Vec<DailyHistory>,
}

impl HistoryTable {
    /// Builds a table from rows, sorting them by date.
    pub fn new(mut rows: Vec<DailyHistory>) -> Self {
        rows.sort_by_key(|row| row.date);
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Zips the parallel `daily` arrays of an archive response into rows.
    pub fn from_response(response: &ArchiveResponse) -> Result<Self, FetchError> {
        let daily = &response.daily;
        let expected = daily.time.len();
        for (series, found) in [
            ("temperature_2m_max", daily.temperature_2m_max.len()),
            ("temperature_2m_min", daily.temperature_2m_min.len()),
            ("precipitation_sum", daily.precipitation_sum.len()),
        ] {
            if found != expected {
                return Err(FetchError::LengthMismatch {
                    series,
                    expected,
                    found,
                });
            }
        }

        let rows = daily
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| {
                Ok(DailyHistory {
                    date: parse_date(time)?,
                    temp_max_c: daily.temperature_2m_max[i].unwrap_or(f64::NAN),
                    temp_min_c: daily.temperature_2m_min[i].unwrap_or(f64::NAN),
                    precipitation_mm: daily.precipitation_sum[i].unwrap_or(f64::NAN),
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        let table = Self::new(rows);
        if table.has_duplicate_dates() {
            warn!("Archive response contains duplicate dates");
        }
        Ok(table)
    }

    /// Whether two rows share a date. Rows are sorted, so neighbours suffice.
    pub fn has_duplicate_dates(&self) -> bool {
        self.rows.windows(2).any(|pair| pair[0].date == pair[1].date)
    }

    /// Drops rows falling outside `range`.
    pub fn restricted_to(mut self, range: &DateRange) -> Self {
        let before = self.rows.len();
        self.rows.retain(|row| range.contains(row.date));
        let dropped = before - self.rows.len();
        if dropped > 0 {
            warn!("Dropped {} history rows outside {}", dropped, range);
        }
        if self.rows.len() != range.num_days() {
            warn!(
                "History for {} has {} rows, expected {}",
                range,
                self.rows.len(),
                range.num_days()
            );
        }
        self
    }

    pub fn rows(&self) -> &[DailyHistory] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Long-format series of the selected variables, grouped by variable then date.
    pub fn melt(&self, selection: &[HistoryVariable]) -> Vec<LongRow<NaiveDate>> {
        selection
            .iter()
            .flat_map(|variable| {
                self.rows.iter().map(move |row| LongRow {
                    time: row.date,
                    variable: variable.label(),
                    value: row.value(*variable),
                })
            })
            .collect()
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| FetchError::InvalidTimestamp {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_data::responses::DailySeries;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn response(times: &[&str]) -> ArchiveResponse {
        let n = times.len();
        ArchiveResponse {
            daily: DailySeries {
                time: times.iter().map(|t| t.to_string()).collect(),
                temperature_2m_max: (0..n).map(|i| Some(25.0 + i as f64)).collect(),
                temperature_2m_min: vec![Some(15.0); n],
                precipitation_sum: vec![Some(0.0); n],
            },
        }
    }

    #[test]
    fn test_from_response_parses_dates() -> Result<(), Box<dyn std::error::Error>> {
        let table = HistoryTable::from_response(&response(&["2024-01-01", "2024-01-02"]))?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].date, date(2024, 1, 1));
        assert_eq!(table.rows()[1].temp_max_c, 26.0);
        Ok(())
    }

    #[test]
    fn test_from_response_sorts_unordered_days() -> Result<(), Box<dyn std::error::Error>> {
        let table = HistoryTable::from_response(&response(&[
            "2024-01-03",
            "2024-01-01",
            "2024-01-02",
        ]))?;
        let dates: Vec<_> = table.rows().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        // Values travel with their date
        assert_eq!(table.rows()[2].temp_max_c, 25.0);
        Ok(())
    }

    #[test]
    fn test_duplicate_dates_are_detected() -> Result<(), Box<dyn std::error::Error>> {
        let table = HistoryTable::from_response(&response(&[
            "2024-01-02",
            "2024-01-01",
            "2024-01-02",
        ]))?;
        // Kept as delivered, but flagged
        assert_eq!(table.len(), 3);
        assert!(table.has_duplicate_dates());

        let unique = HistoryTable::from_response(&response(&["2024-01-01", "2024-01-02"]))?;
        assert!(!unique.has_duplicate_dates());
        Ok(())
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut bad = response(&["2024-01-01", "2024-01-02"]);
        bad.daily.precipitation_sum.push(Some(1.0));
        assert!(matches!(
            HistoryTable::from_response(&bad),
            Err(FetchError::LengthMismatch {
                series: "precipitation_sum",
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_restricted_to_drops_days_outside_range() -> Result<(), Box<dyn std::error::Error>> {
        let table = HistoryTable::from_response(&response(&[
            "2023-12-31",
            "2024-01-01",
            "2024-01-02",
        ]))?;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2));
        let restricted = table.restricted_to(&range);
        assert_eq!(restricted.len(), range.num_days());
        assert_eq!(restricted.rows()[0].date, date(2024, 1, 1));
        Ok(())
    }

    #[test]
    fn test_melt_history() -> Result<(), Box<dyn std::error::Error>> {
        let table = HistoryTable::from_response(&response(&["2024-01-01", "2024-01-02"]))?;
        let long = table.melt(&HistoryVariable::ALL);
        assert_eq!(long.len(), 6);
        assert_eq!(long[2].variable, "Temperatura Mínima diária (°C)");
        assert_eq!(long[2].time, date(2024, 1, 1));
        assert_eq!(long[5].variable, "Precipitação (mm)");
        Ok(())
    }
}
