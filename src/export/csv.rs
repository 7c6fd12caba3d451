//! CSV form of the dashboard tables.
//!
//! Headers are the display labels with [`TIME_LABEL`] for the time column.
//! Missing values are written as empty fields and read back as `NaN`.

use crate::types::forecast_table::{
    parse_timestamp, ForecastTable, HourlyForecast, TIMESTAMP_FORMAT,
};
use crate::types::history_table::{parse_date, DailyHistory, HistoryTable, DATE_FORMAT};
use crate::types::variables::{ForecastVariable, HistoryVariable, TIME_LABEL};
use crate::ClimaError;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::io::Cursor;

fn nan_as_null(values: impl Iterator<Item = f64>) -> Vec<Option<f64>> {
    values.map(|v| if v.is_nan() { None } else { Some(v) }).collect()
}

impl ForecastTable {
    /// One `Tempo` datetime column followed by every forecast variable.
    pub fn to_dataframe(&self) -> Result<DataFrame, ClimaError> {
        let times: Vec<NaiveDateTime> = self
            .rows()
            .iter()
            .map(|row| row.timestamp.naive_utc())
            .collect();

        let mut columns = vec![Column::new(TIME_LABEL.into(), times)];
        for variable in ForecastVariable::ALL {
            let values = nan_as_null(self.rows().iter().map(|row| row.value(variable)));
            columns.push(Column::new(variable.label().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, ClimaError> {
        let mut df = self.to_dataframe()?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .with_datetime_format(Some(TIMESTAMP_FORMAT.to_string()))
            .finish(&mut df)?;
        Ok(buf)
    }

    /// Parses a CSV written by [`ForecastTable::to_csv`].
    pub fn from_csv(bytes: &[u8]) -> Result<Self, ClimaError> {
        let df = read_csv(bytes)?;
        let times = text_column(&df, TIME_LABEL)?;
        let temperature = float_column(&df, ForecastVariable::Temperature.label())?;
        let humidity = float_column(&df, ForecastVariable::Humidity.label())?;
        let wind_speed = float_column(&df, ForecastVariable::WindSpeed.label())?;

        let rows = times
            .iter()
            .enumerate()
            .map(|(i, time)| {
                let timestamp =
                    parse_timestamp(time).map_err(|_| invalid_value(TIME_LABEL, time))?;
                Ok(HourlyForecast {
                    timestamp,
                    temperature_c: temperature[i],
                    humidity_pct: humidity[i],
                    wind_speed_ms: wind_speed[i],
                })
            })
            .collect::<Result<Vec<_>, ClimaError>>()?;

        Ok(Self::new(rows))
    }
}

impl HistoryTable {
    /// One `Tempo` date column followed by every history variable.
    pub fn to_dataframe(&self) -> Result<DataFrame, ClimaError> {
        let dates: Vec<NaiveDate> = self.rows().iter().map(|row| row.date).collect();

        let mut columns = vec![Column::new(TIME_LABEL.into(), dates)];
        for variable in HistoryVariable::ALL {
            let values = nan_as_null(self.rows().iter().map(|row| row.value(variable)));
            columns.push(Column::new(variable.label().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, ClimaError> {
        let mut df = self.to_dataframe()?;
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .with_date_format(Some(DATE_FORMAT.to_string()))
            .finish(&mut df)?;
        Ok(buf)
    }

    /// Parses a CSV written by [`HistoryTable::to_csv`].
    pub fn from_csv(bytes: &[u8]) -> Result<Self, ClimaError> {
        let df = read_csv(bytes)?;
        let dates = text_column(&df, TIME_LABEL)?;
        let temp_max = float_column(&df, HistoryVariable::TempMax.label())?;
        let temp_min = float_column(&df, HistoryVariable::TempMin.label())?;
        let precipitation = float_column(&df, HistoryVariable::Precipitation.label())?;

        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, date)| {
                let date = parse_date(date).map_err(|_| invalid_value(TIME_LABEL, date))?;
                Ok(DailyHistory {
                    date,
                    temp_max_c: temp_max[i],
                    temp_min_c: temp_min[i],
                    precipitation_mm: precipitation[i],
                })
            })
            .collect::<Result<Vec<_>, ClimaError>>()?;

        Ok(Self::new(rows))
    }
}

fn read_csv(bytes: &[u8]) -> Result<DataFrame, ClimaError> {
    Ok(CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ClimaError> {
    df.column(name)
        .map_err(|_| ClimaError::MissingColumn(name.to_string()))
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, ClimaError> {
    let casted = column(df, name)?.cast(&DataType::String)?;
    casted
        .str()?
        .into_iter()
        .map(|value| {
            value
                .map(str::to_string)
                .ok_or_else(|| invalid_value(name, ""))
        })
        .collect()
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, ClimaError> {
    let casted = column(df, name)?.cast(&DataType::Float64)?;
    Ok(casted
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}

fn invalid_value(column: &str, value: &str) -> ClimaError {
    ClimaError::InvalidCsvValue {
        column: column.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn forecast() -> ForecastTable {
        ForecastTable::new(
            (0..3)
                .map(|h| HourlyForecast {
                    timestamp: Utc.with_ymd_and_hms(2024, 5, 10, h, 0, 0).unwrap(),
                    temperature_c: 18.5 + h as f64,
                    humidity_pct: 70.0,
                    wind_speed_ms: 2.25,
                })
                .collect(),
        )
    }

    fn history() -> HistoryTable {
        HistoryTable::new(
            (1..=3)
                .map(|d| DailyHistory {
                    date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    temp_max_c: 28.0 + d as f64,
                    temp_min_c: 16.5,
                    precipitation_mm: 0.1 * d as f64,
                })
                .collect(),
        )
    }

    #[test]
    fn test_forecast_csv_layout() -> Result<(), Box<dyn std::error::Error>> {
        let csv = String::from_utf8(forecast().to_csv()?)?;
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Tempo,Temperatura (°C),Umidade (%),Vento (m/s)")
        );
        assert!(lines
            .next()
            .is_some_and(|line| line.starts_with("2024-05-10T00:00,18.5,")));
        Ok(())
    }

    #[test]
    fn test_forecast_csv_parses_back() -> Result<(), Box<dyn std::error::Error>> {
        let table = forecast();
        assert_eq!(ForecastTable::from_csv(&table.to_csv()?)?, table);
        Ok(())
    }

    #[test]
    fn test_history_csv_parses_back() -> Result<(), Box<dyn std::error::Error>> {
        let table = history();
        let csv = table.to_csv()?;
        assert!(String::from_utf8(csv.clone())?.contains("2024-01-02,"));
        assert_eq!(HistoryTable::from_csv(&csv)?, table);
        Ok(())
    }

    #[test]
    fn test_missing_values_stay_missing() -> Result<(), Box<dyn std::error::Error>> {
        let mut rows = history().rows().to_vec();
        rows[1].precipitation_mm = f64::NAN;
        let parsed = HistoryTable::from_csv(&HistoryTable::new(rows).to_csv()?)?;
        assert!(parsed.rows()[1].precipitation_mm.is_nan());
        assert_eq!(parsed.rows()[2].precipitation_mm, 0.1 * 3.0);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "Tempo,Precipitação (mm)\n2024-01-01,1.0\n";
        assert!(matches!(
            HistoryTable::from_csv(csv.as_bytes()),
            Err(ClimaError::MissingColumn(name)) if name == "Temperatura Máxima diária (°C)"
        ));
    }

    #[test]
    fn test_bad_date_is_reported() {
        let csv = "Tempo,Temperatura Máxima diária (°C),Temperatura Mínima diária (°C),Precipitação (mm)\n\
                   ontem,30.0,18.0,0.0\n";
        assert!(matches!(
            HistoryTable::from_csv(csv.as_bytes()),
            Err(ClimaError::InvalidCsvValue { value, .. }) if value == "ontem"
        ));
    }
}
