use crate::config::DashboardConfig;
use crate::types::date_range::DateRange;
use crate::types::lat_lon::LatLon;
use crate::weather_data::error::FetchError;
use crate::weather_data::responses::{
    ApiErrorBody, ArchiveResponse, ForecastResponse, DAILY_VARIABLES, HOURLY_VARIABLES,
};
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Issues the raw Open-Meteo requests. Knows nothing about caching.
#[derive(Debug, Clone)]
pub struct WeatherDataLoader {
    client: Client,
    forecast_url: String,
    archive_url: String,
}

impl WeatherDataLoader {
    pub fn new(client: Client, config: &DashboardConfig) -> WeatherDataLoader {
        WeatherDataLoader {
            client,
            forecast_url: config.forecast_url.clone(),
            archive_url: config.archive_url.clone(),
        }
    }

    /// Hourly temperature, relative humidity and wind speed for `location`.
    pub async fn forecast(&self, location: LatLon) -> Result<ForecastResponse, FetchError> {
        let mut query = location.query_params().to_vec();
        query.push(("hourly", HOURLY_VARIABLES.to_string()));
        self.get_json(&self.forecast_url, &query).await
    }

    /// Daily max/min temperature and precipitation sum for `location` over `range`.
    ///
    /// `range` is expected to be valid; callers check before calling.
    pub async fn archive(
        &self,
        location: LatLon,
        range: &DateRange,
    ) -> Result<ArchiveResponse, FetchError> {
        let mut query = location.query_params().to_vec();
        query.extend(range.query_params());
        query.push(("daily", DAILY_VARIABLES.to_string()));
        self.get_json(&self.archive_url, &query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        info!("Requesting {} with {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
                warn!("Open-Meteo rejected {}: {}", url, api_error.reason);
                return Err(FetchError::ApiRejected {
                    url: url.to_string(),
                    status,
                    reason: api_error.reason,
                });
            }
            warn!("HTTP error {} for {}", status, url);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::BodyRead(url.to_string(), e))?;
        info!("Received {} bytes from {}", bytes.len(), url);

        serde_json::from_slice(&bytes).map_err(|source| FetchError::JsonParse {
            url: url.to_string(),
            source,
        })
    }
}
