//! Selectable chart variables and the long ("melted") series built from them.
//!
//! Selecting variables only decides which already-fetched columns are
//! charted; it never changes what is requested upstream.

use crate::ClimaError;
use std::fmt;
use std::str::FromStr;

/// Header used for the time column in exports and long series.
pub const TIME_LABEL: &str = "Tempo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastVariable {
    Temperature,
    Humidity,
    WindSpeed,
}

impl ForecastVariable {
    pub const ALL: [ForecastVariable; 3] = [
        ForecastVariable::Temperature,
        ForecastVariable::Humidity,
        ForecastVariable::WindSpeed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ForecastVariable::Temperature => "Temperatura (°C)",
            ForecastVariable::Humidity => "Umidade (%)",
            ForecastVariable::WindSpeed => "Vento (m/s)",
        }
    }
}

impl FromStr for ForecastVariable {
    type Err = ClimaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(ForecastVariable::Temperature),
            "humidity" | "rhum" => Ok(ForecastVariable::Humidity),
            "wind" | "windspeed" | "wspd" => Ok(ForecastVariable::WindSpeed),
            _ => Err(ClimaError::UnknownVariable(s.to_string())),
        }
    }
}

impl fmt::Display for ForecastVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryVariable {
    TempMax,
    TempMin,
    Precipitation,
}

impl HistoryVariable {
    pub const ALL: [HistoryVariable; 3] = [
        HistoryVariable::TempMax,
        HistoryVariable::TempMin,
        HistoryVariable::Precipitation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HistoryVariable::TempMax => "Temperatura Máxima diária (°C)",
            HistoryVariable::TempMin => "Temperatura Mínima diária (°C)",
            HistoryVariable::Precipitation => "Precipitação (mm)",
        }
    }
}

impl FromStr for HistoryVariable {
    type Err = ClimaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "tmax" => Ok(HistoryVariable::TempMax),
            "min" | "tmin" => Ok(HistoryVariable::TempMin),
            "precipitation" | "prcp" | "rain" => Ok(HistoryVariable::Precipitation),
            _ => Err(ClimaError::UnknownVariable(s.to_string())),
        }
    }
}

impl fmt::Display for HistoryVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One `(time, variable, value)` observation of a melted table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow<T> {
    pub time: T,
    pub variable: &'static str,
    pub value: f64,
}
