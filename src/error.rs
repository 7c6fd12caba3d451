use crate::weather_data::error::FetchError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimaError {
    #[error("Weather data unavailable")]
    DataUnavailable(#[from] FetchError),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("No history rows to compute statistics from")]
    EmptyStatisticsInput,

    /// History could not be fetched; carries the full cause chain as text.
    #[error("History unavailable: {0}")]
    HistoryUnavailable(String),

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Failed to create export directory '{0}'")]
    ExportDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write export file '{0}'")]
    ExportWrite(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Missing required column '{0}' in CSV data")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in CSV column '{column}'")]
    InvalidCsvValue { column: String, value: String },
}
