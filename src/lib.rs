mod cache;
mod config;
mod dashboard;
mod error;
mod export;
mod report;
mod statistics;
mod types;
mod utils;
mod weather_data;

pub use error::ClimaError;
pub use weather_data::error::FetchError;

pub use config::*;
pub use dashboard::{error_chain, Dashboard, DashboardSnapshot};
pub use statistics::DerivedStatistics;

pub use cache::clock::{Clock, ManualClock, SystemClock};
pub use cache::response_cache::{ResponseCache, DEFAULT_TTL};

pub use types::date_range::{DateRange, DEFAULT_HISTORY_DAYS};
pub use types::forecast_table::{ForecastTable, HourlyForecast, TIMESTAMP_FORMAT};
pub use types::history_table::{DailyHistory, HistoryTable, DATE_FORMAT};
pub use types::lat_lon::{LatLon, LAVRAS};
pub use types::variables::{ForecastVariable, HistoryVariable, LongRow, TIME_LABEL};
pub use types::weekday::{weekday_label, weekday_label_for_ordinal, WEEKDAY_LABELS};

pub use weather_data::responses::{ArchiveResponse, DailySeries, ForecastResponse, HourlySeries};

pub use report::*;

pub use export::{history_csv_file_name, ChartKind, Exporter, FORECAST_CSV_FILE};
#[cfg(feature = "charts")]
pub use export::charts::*;
