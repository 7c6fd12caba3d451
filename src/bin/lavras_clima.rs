//! Prints the Lavras weather summary and writes the dashboard exports.
//!
//! ```text
//! RUST_LOG=info lavras-clima --start 2024-01-01 --end 2024-01-31 --output-dir ./out
//! ```

use chrono::{NaiveDate, TimeDelta};
use clap::Parser;
use lavras_clima::{
    error_chain, history_csv_file_name, metrics, period_intro, ClimaError, Dashboard,
    DashboardConfig, DashboardSnapshot, DateRange, Exporter, ForecastVariable, HistoryVariable,
    Narrative, DEFAULT_ARCHIVE_URL, DEFAULT_FORECAST_URL, FORECAST_CSV_FILE, INVALID_RANGE_MESSAGE,
    NO_DATA_MESSAGE,
};
use log::{error, warn};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lavras-clima",
    version,
    about = "Previsão e histórico do clima de Lavras - MG (Open-Meteo)"
)]
struct Cli {
    /// First day of the history period (YYYY-MM-DD). Defaults to 30 days ago.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the history period (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Directory for CSV and chart exports.
    #[arg(long, env = "LAVRAS_CLIMA_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    #[arg(long, env = "LAVRAS_CLIMA_FORECAST_URL", default_value = DEFAULT_FORECAST_URL)]
    forecast_url: String,

    #[arg(long, env = "LAVRAS_CLIMA_ARCHIVE_URL", default_value = DEFAULT_ARCHIVE_URL)]
    archive_url: String,

    /// Cache lifetime of forecast responses, in minutes (0 to 525600).
    #[arg(
        long,
        env = "LAVRAS_CLIMA_FORECAST_TTL_MINUTES",
        default_value = "60",
        value_parser = parse_ttl_minutes
    )]
    forecast_ttl_minutes: TimeDelta,

    /// Cache lifetime of history responses, in minutes (0 to 525600).
    #[arg(
        long,
        env = "LAVRAS_CLIMA_HISTORY_TTL_MINUTES",
        default_value = "60",
        value_parser = parse_ttl_minutes
    )]
    history_ttl_minutes: TimeDelta,

    /// Forecast variables to chart: temperature, humidity, wind.
    #[arg(long, value_delimiter = ',', default_value = "temperature,humidity,wind")]
    forecast_vars: Vec<ForecastVariable>,

    /// History variables to chart: max, min, precipitation.
    #[arg(long, value_delimiter = ',', default_value = "max,min,precipitation")]
    history_vars: Vec<HistoryVariable>,

    /// Only print the summary, write no files.
    #[arg(long)]
    no_export: bool,
}

/// Longest accepted cache lifetime: one year.
const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

fn parse_ttl_minutes(value: &str) -> Result<TimeDelta, String> {
    let minutes: i64 = value
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a number of minutes: {}", value, e))?;
    if !(0..=MAX_TTL_MINUTES).contains(&minutes) {
        return Err(format!(
            "{} minutes is outside 0..={}",
            minutes, MAX_TTL_MINUTES
        ));
    }
    TimeDelta::try_minutes(minutes).ok_or_else(|| format!("{} minutes is out of range", minutes))
}

impl Cli {
    fn range(&self) -> DateRange {
        let default = DateRange::default_for_today();
        DateRange::new(
            self.start.unwrap_or(default.start),
            self.end.unwrap_or(default.end),
        )
    }

    fn config(&self) -> DashboardConfig {
        let config = DashboardConfig::builder()
            .forecast_url(self.forecast_url.as_str())
            .archive_url(self.archive_url.as_str())
            .forecast_ttl(self.forecast_ttl_minutes)
            .history_ttl(self.history_ttl_minutes);
        match &self.output_dir {
            Some(dir) => config.export_dir(dir.clone()).build(),
            None => config.build(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let dashboard = Dashboard::with_config(cli.config())?;
    let snapshot = dashboard.snapshot().range(cli.range()).call().await;

    print_summary(&snapshot);

    if !cli.no_export {
        let exporter = Exporter::new(dashboard.config().export_dir.clone());
        if let Err(e) = export(&exporter, &snapshot, &cli).await {
            error!("Export failed: {}", error_chain(&e));
            return Err(e.into());
        }
    }
    Ok(())
}

fn print_summary(snapshot: &DashboardSnapshot) {
    match &snapshot.forecast {
        Ok(forecast) => println!("🌤️ Previsão: {} horas disponíveis", forecast.len()),
        Err(e) => println!("Previsão indisponível: {}", error_chain(e)),
    }
    println!();

    if snapshot.range_error().is_some() {
        println!("{}", INVALID_RANGE_MESSAGE);
        return;
    }
    if let Err(e) = &snapshot.history {
        println!("Histórico indisponível: {}", error_chain(e));
        return;
    }

    println!("{}", period_intro(&snapshot.range));
    match snapshot.statistics() {
        Ok(stats) => {
            for metric in metrics(&stats) {
                println!("{}: {}", metric.label, metric.value);
            }
            println!();
            for line in Narrative::from_statistics(&stats).lines() {
                println!("{}", line);
            }
        }
        Err(_) => println!("{}", NO_DATA_MESSAGE),
    }
}

async fn export(
    exporter: &Exporter,
    snapshot: &DashboardSnapshot,
    cli: &Cli,
) -> Result<(), ClimaError> {
    if let Ok(forecast) = &snapshot.forecast {
        let path = exporter.write(FORECAST_CSV_FILE, forecast.to_csv()?).await?;
        println!("📥 {}", path.display());
        write_forecast_charts(exporter, forecast, &cli.forecast_vars).await?;
    }

    match &snapshot.history {
        Ok(history) if !history.is_empty() => {
            let name = history_csv_file_name(&snapshot.range);
            let path = exporter.write(&name, history.to_csv()?).await?;
            println!("📥 {}", path.display());
            write_history_charts(exporter, history, &cli.history_vars).await?;
        }
        Ok(_) => warn!("No history rows for {}, skipping history export", snapshot.range),
        Err(_) => {}
    }
    Ok(())
}

#[cfg(feature = "charts")]
async fn write_forecast_charts(
    exporter: &Exporter,
    forecast: &lavras_clima::ForecastTable,
    selection: &[ForecastVariable],
) -> Result<(), ClimaError> {
    use lavras_clima::{forecast_temperature_chart, forecast_variables_chart, ChartKind};

    exporter
        .write_chart(
            ChartKind::ForecastTemperature,
            &forecast_temperature_chart(forecast)?,
        )
        .await?;
    if let Some(chart) = forecast_variables_chart(forecast, selection)? {
        exporter
            .write_chart(ChartKind::ForecastVariables, &chart)
            .await?;
    }
    Ok(())
}

#[cfg(not(feature = "charts"))]
async fn write_forecast_charts(
    _exporter: &Exporter,
    _forecast: &lavras_clima::ForecastTable,
    _selection: &[ForecastVariable],
) -> Result<(), ClimaError> {
    Ok(())
}

#[cfg(feature = "charts")]
async fn write_history_charts(
    exporter: &Exporter,
    history: &lavras_clima::HistoryTable,
    selection: &[HistoryVariable],
) -> Result<(), ClimaError> {
    use lavras_clima::{
        history_precipitation_chart, history_temperatures_chart, history_variables_chart,
        ChartKind,
    };

    exporter
        .write_chart(
            ChartKind::HistoryPrecipitation,
            &history_precipitation_chart(history)?,
        )
        .await?;
    exporter
        .write_chart(
            ChartKind::HistoryTemperatures,
            &history_temperatures_chart(history)?,
        )
        .await?;
    if let Some(chart) = history_variables_chart(history, selection)? {
        exporter
            .write_chart(ChartKind::HistoryVariables, &chart)
            .await?;
    }
    Ok(())
}

#[cfg(not(feature = "charts"))]
async fn write_history_charts(
    _exporter: &Exporter,
    _history: &lavras_clima::HistoryTable,
    _selection: &[HistoryVariable],
) -> Result<(), ClimaError> {
    Ok(())
}
