//! This module provides the main entry point of the crate, the [`Dashboard`].
//! It owns the HTTP client and the response caches, and assembles everything a
//! single render pass needs into a [`DashboardSnapshot`].

use crate::config::DashboardConfig;
use crate::error::ClimaError;
use crate::statistics::DerivedStatistics;
use crate::types::date_range::DateRange;
use crate::types::forecast_table::ForecastTable;
use crate::types::history_table::HistoryTable;
use crate::weather_data::table_fetcher::TableFetcher;
use bon::bon;
use log::{error, info, warn};
use reqwest::Client;

/// Fetches and shapes the Lavras forecast and history.
///
/// Create one per process and share it: the caches inside are what keep
/// repeated interactions from hitting Open-Meteo again.
///
/// # Examples
///
/// ```no_run
/// # use lavras_clima::{Dashboard, ClimaError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ClimaError> {
/// let dashboard = Dashboard::new()?;
///
/// let forecast = dashboard.forecast().await?;
/// println!("{} forecast hours", forecast.len());
///
/// // Default range: the last 30 days through today
/// let snapshot = dashboard.snapshot().call().await;
/// if let Ok(stats) = snapshot.statistics() {
///     println!("Hottest day: {}", stats.hottest_day.date);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    fetcher: TableFetcher,
}

#[bon]
impl Dashboard {
    /// Creates a dashboard with the production configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::HttpClient`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ClimaError> {
        Self::with_config(DashboardConfig::default())
    }

    /// Creates a dashboard with a custom configuration.
    pub fn with_config(config: DashboardConfig) -> Result<Self, ClimaError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClimaError::HttpClient)?;
        Ok(Self {
            fetcher: TableFetcher::new(client, &config),
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The hourly forecast for the configured location.
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::DataUnavailable`] when the request fails or the
    /// response does not have the expected shape.
    pub async fn forecast(&self) -> Result<ForecastTable, ClimaError> {
        Ok(self.fetcher.get_forecast().await?)
    }

    /// The daily history over `range`.
    ///
    /// An invalid range (start after end) is not an error: it yields an empty
    /// table and nothing is requested upstream. Use [`DateRange::validate`] to
    /// surface the validation message.
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::DataUnavailable`] when the request fails or the
    /// response does not have the expected shape.
    pub async fn history(&self, range: DateRange) -> Result<HistoryTable, ClimaError> {
        if !range.is_valid() {
            warn!("Invalid history range {}, using an empty table", range);
            return Ok(HistoryTable::empty());
        }
        Ok(self.fetcher.get_history(range).await?)
    }

    /// Gathers everything one render pass needs.
    ///
    /// Forecast and history are fetched one after the other and fail
    /// independently: an error in one is recorded in the snapshot and does not
    /// prevent the other from loading.
    ///
    /// # Arguments
    ///
    /// * `.range(DateRange)`: Optional. The history period. Defaults to the
    ///   last 30 days through today.
    #[builder]
    pub async fn snapshot(&self, range: Option<DateRange>) -> DashboardSnapshot {
        let range = range.unwrap_or_else(DateRange::default_for_today);
        info!("Building dashboard snapshot for {}", range);

        let forecast = self.forecast().await;
        if let Err(e) = &forecast {
            error!("Forecast unavailable: {}", error_chain(e));
        }
        let history = self.history(range).await;
        if let Err(e) = &history {
            error!("History unavailable: {}", error_chain(e));
        }

        DashboardSnapshot {
            range,
            forecast,
            history,
        }
    }

    /// Drops expired responses from both caches. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.fetcher.purge_expired().await
    }
}

/// The result of one render pass.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub forecast: Result<ForecastTable, ClimaError>,
    pub history: Result<HistoryTable, ClimaError>,
}

impl DashboardSnapshot {
    /// The validation error of the requested range, if it is inverted.
    pub fn range_error(&self) -> Option<ClimaError> {
        self.range.validate().err()
    }

    /// History statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ClimaError::EmptyStatisticsInput`] when the history has no rows
    /// (including an invalid range), and [`ClimaError::HistoryUnavailable`] when
    /// the history could not be fetched.
    pub fn statistics(&self) -> Result<DerivedStatistics, ClimaError> {
        match &self.history {
            Ok(table) => table.statistics(),
            Err(e) => Err(ClimaError::HistoryUnavailable(error_chain(e))),
        }
    }
}

/// `error: cause: cause` on one line, for logs.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard_for(server: &MockServer, clock: Arc<ManualClock>) -> Dashboard {
        let config = DashboardConfig::builder()
            .forecast_url(format!("{}/v1/forecast", server.uri()))
            .archive_url(format!("{}/v1/archive", server.uri()))
            .clock(clock)
            .build();
        Dashboard::with_config(config).unwrap()
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn forecast_body() -> serde_json::Value {
        json!({
            "latitude": -21.25,
            "longitude": -45.0,
            "hourly_units": {"time": "iso8601"},
            "hourly": {
                "time": ["2024-02-01T00:00", "2024-02-01T01:00", "2024-02-01T02:00"],
                "temperature_2m": [21.3, 20.9, null],
                "relativehumidity_2m": [88, 90, 91],
                "windspeed_10m": [4.1, 3.6, 2.9]
            }
        })
    }

    fn archive_body(range: &DateRange) -> serde_json::Value {
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        let n = days.len();
        json!({
            "daily": {
                "time": days,
                "temperature_2m_max": (0..n).map(|i| 28.0 + i as f64).collect::<Vec<_>>(),
                "temperature_2m_min": vec![17.5; n],
                "precipitation_sum": (0..n).map(|i| (i % 3) as f64 * 2.5).collect::<Vec<_>>()
            }
        })
    }

    #[tokio::test]
    async fn test_forecast_is_fetched_and_shaped() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "-21.245"))
            .and(query_param(
                "hourly",
                "temperature_2m,relativehumidity_2m,windspeed_10m",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let forecast = dashboard.forecast().await?;

        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast.rows()[1].humidity_pct, 90.0);
        assert!(forecast.rows()[2].temperature_c.is_nan());
        Ok(())
    }

    #[tokio::test]
    async fn test_history_has_one_row_per_day() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", "2024-01-01"))
            .and(query_param("end_date", "2024-01-31"))
            .and(query_param(
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_sum",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&range)))
            .expect(1)
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let history = dashboard.history(range).await?;

        assert_eq!(history.len(), range.num_days());
        assert!(history
            .rows()
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_range_never_fetches() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let inverted = DateRange::new(date(2024, 1, 10), date(2024, 1, 1));
        let history = dashboard.history(inverted).await?;

        assert!(history.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_history_is_cached_for_one_hour() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&range)))
            .expect(2)
            .mount(&server)
            .await;

        let clock = clock();
        let dashboard = dashboard_for(&server, clock.clone());

        let first = dashboard.history(range).await?;
        clock.advance(TimeDelta::minutes(30));
        let second = dashboard.history(range).await?;
        assert_eq!(first, second);

        clock.advance(TimeDelta::minutes(31));
        dashboard.history(range).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_response_is_data_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hourly": {}})))
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        assert!(matches!(
            dashboard.forecast().await,
            Err(ClimaError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_api_rejection_reason_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": true,
                "reason": "Parameter 'start_date' is out of allowed range"
            })))
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let range = DateRange::new(date(1900, 1, 1), date(1900, 1, 2));
        match dashboard.history(range).await {
            Err(e @ ClimaError::DataUnavailable(_)) => {
                assert!(error_chain(&e).contains("out of allowed range"));
            }
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_isolates_failures() {
        let server = MockServer::start().await;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&range)))
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let snapshot = dashboard.snapshot().range(range).call().await;

        assert!(matches!(
            snapshot.forecast,
            Err(ClimaError::DataUnavailable(_))
        ));
        assert_eq!(snapshot.history.as_ref().map(|h| h.len()).ok(), Some(3));
        assert!(snapshot.range_error().is_none());
        let stats = snapshot.statistics().unwrap();
        assert_eq!(stats.hottest_day.date, date(2024, 1, 3));
    }

    #[tokio::test]
    async fn test_snapshot_statistics_report_failed_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        let snapshot = dashboard.snapshot().range(range).call().await;

        match snapshot.statistics() {
            Err(ClimaError::HistoryUnavailable(cause)) => assert!(cause.contains("503")),
            other => panic!("expected HistoryUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forecast_and_history_expire_independently() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&range)))
            .expect(1)
            .mount(&server)
            .await;

        let clock = clock();
        let config = DashboardConfig::builder()
            .forecast_url(format!("{}/v1/forecast", server.uri()))
            .archive_url(format!("{}/v1/archive", server.uri()))
            .clock(clock.clone())
            .forecast_ttl(TimeDelta::minutes(10))
            .build();
        let dashboard = Dashboard::with_config(config)?;

        dashboard.forecast().await?;
        dashboard.history(range).await?;
        // Both served from cache
        dashboard.forecast().await?;
        dashboard.history(range).await?;

        clock.advance(TimeDelta::minutes(11));
        // Forecast TTL has passed, history TTL (1 h) has not
        dashboard.forecast().await?;
        dashboard.history(range).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_history_cache_bound_evicts_oldest_range() -> Result<(), ClimaError> {
        let server = MockServer::start().await;
        let first = DateRange::new(date(2024, 1, 1), date(2024, 1, 3));
        let second = DateRange::new(date(2024, 2, 1), date(2024, 2, 3));
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", "2024-01-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&first)))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("start_date", "2024-02-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(archive_body(&second)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .expect(1)
            .mount(&server)
            .await;

        let clock = clock();
        let config = DashboardConfig::builder()
            .forecast_url(format!("{}/v1/forecast", server.uri()))
            .archive_url(format!("{}/v1/archive", server.uri()))
            .clock(clock.clone())
            .max_cache_entries(1)
            .build();
        let dashboard = Dashboard::with_config(config)?;

        dashboard.forecast().await?;
        dashboard.history(first).await?;
        clock.advance(TimeDelta::minutes(1));
        // Evicts the first range
        dashboard.history(second).await?;
        clock.advance(TimeDelta::minutes(1));
        assert_eq!(dashboard.history(first).await?.len(), 3);
        // The bound only applies to history; the forecast stays cached
        dashboard.forecast().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_with_inverted_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let dashboard = dashboard_for(&server, clock());
        let inverted = DateRange::new(date(2024, 1, 3), date(2024, 1, 1));
        let snapshot = dashboard.snapshot().range(inverted).call().await;

        assert!(snapshot.forecast.is_ok());
        assert!(matches!(
            snapshot.range_error(),
            Some(ClimaError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            snapshot.statistics(),
            Err(ClimaError::EmptyStatisticsInput)
        ));
    }
}
