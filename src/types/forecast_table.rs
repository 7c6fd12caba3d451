//! Contains the `ForecastTable`, the hourly forecast shaped for the dashboard.

use crate::types::variables::{ForecastVariable, LongRow};
use crate::weather_data::error::FetchError;
use crate::weather_data::responses::ForecastResponse;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;

/// Timestamp layout used by Open-Meteo for hourly series (GMT, minute precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A single hour of forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
}

impl HourlyForecast {
    pub fn value(&self, variable: ForecastVariable) -> f64 {
        match variable {
            ForecastVariable::Temperature => self.temperature_c,
            ForecastVariable::Humidity => self.humidity_pct,
            ForecastVariable::WindSpeed => self.wind_speed_ms,
        }
    }
}

/// Hourly forecast rows in ascending timestamp order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    rows: Vec<HourlyForecast>,
}

impl ForecastTable {
    /// Builds a table from rows, sorting them by timestamp.
    pub fn new(mut rows: Vec<HourlyForecast>) -> Self {
        rows.sort_by_key(|row| row.timestamp);
        Self { rows }
    }

    /// Zips the parallel `hourly` arrays of a forecast response into rows.
    ///
    /// Every series must have as many values as `hourly.time`. Upstream `null`
    /// values become `NaN`.
    pub fn from_response(response: &ForecastResponse) -> Result<Self, FetchError> {
        let hourly = &response.hourly;
        let expected = hourly.time.len();
        for (series, found) in [
            ("temperature_2m", hourly.temperature_2m.len()),
            ("relativehumidity_2m", hourly.relativehumidity_2m.len()),
            ("windspeed_10m", hourly.windspeed_10m.len()),
        ] {
            if found != expected {
                return Err(FetchError::LengthMismatch {
                    series,
                    expected,
                    found,
                });
            }
        }

        let mut rows = Vec::with_capacity(expected);
        for (i, time) in hourly.time.iter().enumerate() {
            rows.push(HourlyForecast {
                timestamp: parse_timestamp(time)?,
                temperature_c: hourly.temperature_2m[i].unwrap_or(f64::NAN),
                humidity_pct: hourly.relativehumidity_2m[i].unwrap_or(f64::NAN),
                wind_speed_ms: hourly.windspeed_10m[i].unwrap_or(f64::NAN),
            });
        }

        let table = Self::new(rows);
        if table.has_duplicate_timestamps() {
            warn!("Forecast response contains duplicate timestamps");
        }
        Ok(table)
    }

    /// Whether two rows share a timestamp. Rows are sorted, so neighbours suffice.
    pub fn has_duplicate_timestamps(&self) -> bool {
        self.rows
            .windows(2)
            .any(|pair| pair[0].timestamp == pair[1].timestamp)
    }

    pub fn rows(&self) -> &[HourlyForecast] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Long-format series of the selected variables, one row per hour per variable.
    ///
    /// Rows are grouped by variable in selection order, then by time.
    pub fn melt(&self, selection: &[ForecastVariable]) -> Vec<LongRow<DateTime<Utc>>> {
        selection
            .iter()
            .flat_map(|variable| {
                self.rows.iter().map(move |row| LongRow {
                    time: row.timestamp,
                    variable: variable.label(),
                    value: row.value(*variable),
                })
            })
            .collect()
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, FetchError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| FetchError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
