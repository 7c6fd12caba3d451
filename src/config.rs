//! Runtime configuration of a [`crate::Dashboard`].

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::response_cache::DEFAULT_TTL;
use crate::types::lat_lon::{LatLon, LAVRAS};
use bon::Builder;
use chrono::TimeDelta;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const EXPORT_DIR_NAME: &str = "clima_lavras";

/// Settings for the fetchers, caches and exports.
///
/// Every field has a default, so `DashboardConfig::builder().build()` gives the
/// production setup: Open-Meteo endpoints, Lavras, one hour TTLs.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use lavras_clima::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .forecast_ttl(TimeDelta::minutes(15))
///     .max_cache_entries(64)
///     .build();
/// assert_eq!(config.history_ttl, TimeDelta::hours(1));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    #[builder(into, default = DEFAULT_FORECAST_URL.to_string())]
    pub forecast_url: String,

    #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())]
    pub archive_url: String,

    #[builder(default = LAVRAS)]
    pub location: LatLon,

    #[builder(default = DEFAULT_TTL)]
    pub forecast_ttl: TimeDelta,

    #[builder(default = DEFAULT_TTL)]
    pub history_ttl: TimeDelta,

    /// Upper bound on cached history ranges. Unbounded when not set.
    pub max_cache_entries: Option<usize>,

    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,

    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    pub clock: Arc<dyn Clock>,

    #[builder(into, default = default_export_dir())]
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// `<downloads>/clima_lavras`, or `./clima_lavras` when the platform has no
/// downloads directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(EXPORT_DIR_NAME)
}
