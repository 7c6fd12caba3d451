use crate::cache::response_cache::ResponseCache;
use crate::config::DashboardConfig;
use crate::types::date_range::DateRange;
use crate::types::forecast_table::ForecastTable;
use crate::types::history_table::HistoryTable;
use crate::types::lat_lon::{LatLon, LocationKey};
use crate::weather_data::data_loader::WeatherDataLoader;
use crate::weather_data::error::FetchError;
use crate::weather_data::responses::{ArchiveResponse, ForecastResponse};
use reqwest::Client;

/// Forecast and history fetchers sharing one loader, each behind its own cache.
///
/// The caches hold raw responses; tables are reshaped from them on every call.
#[derive(Debug)]
pub struct TableFetcher {
    loader: WeatherDataLoader,
    location: LatLon,
    forecast_cache: ResponseCache<LocationKey, ForecastResponse>,
    history_cache: ResponseCache<(LocationKey, DateRange), ArchiveResponse>,
}

impl TableFetcher {
    pub fn new(client: Client, config: &DashboardConfig) -> Self {
        let forecast_cache = ResponseCache::new(config.forecast_ttl, config.clock.clone());
        let mut history_cache = ResponseCache::new(config.history_ttl, config.clock.clone());
        if let Some(max_entries) = config.max_cache_entries {
            history_cache = history_cache.with_max_entries(max_entries);
        }
        Self {
            loader: WeatherDataLoader::new(client, config),
            location: config.location,
            forecast_cache,
            history_cache,
        }
    }

    /// Hourly forecast for the configured location.
    pub async fn get_forecast(&self) -> Result<ForecastTable, FetchError> {
        let location = self.location;
        let response = self
            .forecast_cache
            .lookup_or_fetch(location.cache_key(), || self.loader.forecast(location))
            .await?;
        ForecastTable::from_response(&response)
    }

    /// Daily history for the configured location over `range`.
    ///
    /// Must only be called with a valid range; see [`crate::Dashboard::history`]
    /// for the checked entry point.
    pub async fn get_history(&self, range: DateRange) -> Result<HistoryTable, FetchError> {
        let location = self.location;
        let response = self
            .history_cache
            .lookup_or_fetch((location.cache_key(), range), || {
                self.loader.archive(location, &range)
            })
            .await?;
        Ok(HistoryTable::from_response(&response)?.restricted_to(&range))
    }

    pub async fn purge_expired(&self) -> usize {
        self.forecast_cache.purge_expired().await + self.history_cache.purge_expired().await
    }
}
