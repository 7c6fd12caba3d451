//! Raw Open-Meteo response shapes.
//!
//! These are what the response cache stores; the tables are rebuilt from them
//! on every pass. Values can be `null` upstream, hence `Option<f64>`.

use serde::{Deserialize, Serialize};

pub(crate) const HOURLY_VARIABLES: &str = "temperature_2m,relativehumidity_2m,windspeed_10m";
pub(crate) const DAILY_VARIABLES: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Body of a forecast endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub relativehumidity_2m: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
}

/// Body of an archive endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub daily: DailySeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub reason: String,
}
