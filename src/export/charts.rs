//! Interactive HTML charts built with `plotlars`.

use crate::export::{ChartKind, Exporter};
use crate::types::forecast_table::{ForecastTable, TIMESTAMP_FORMAT};
use crate::types::history_table::{HistoryTable, DATE_FORMAT};
use crate::types::variables::{ForecastVariable, HistoryVariable, LongRow, TIME_LABEL};
use crate::ClimaError;
use plotlars::{BarPlot, Legend, Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::path::PathBuf;

const VARIABLE_LABEL: &str = "Variável";
const VALUE_LABEL: &str = "Valor";

fn palette(n: usize) -> Vec<Rgb> {
    [Rgb(235, 117, 0), Rgb(69, 157, 230), Rgb(60, 170, 90)]
        .into_iter()
        .take(n)
        .collect()
}

/// Wide frame with the time column as text, which every plot type accepts.
fn wide_frame(times: Vec<String>, series: Vec<(&'static str, Vec<f64>)>) -> PolarsResult<DataFrame> {
    let mut columns = vec![Column::new(TIME_LABEL.into(), times)];
    for (label, values) in series {
        columns.push(Column::new(label.into(), values));
    }
    DataFrame::new(columns)
}

fn long_frame<T>(rows: &[LongRow<T>], format_time: impl Fn(&T) -> String) -> PolarsResult<DataFrame> {
    let times: Vec<String> = rows.iter().map(|row| format_time(&row.time)).collect();
    let variables: Vec<&str> = rows.iter().map(|row| row.variable).collect();
    let values: Vec<f64> = rows.iter().map(|row| row.value).collect();
    DataFrame::new(vec![
        Column::new(TIME_LABEL.into(), times),
        Column::new(VARIABLE_LABEL.into(), variables),
        Column::new(VALUE_LABEL.into(), values),
    ])
}

fn forecast_frame(table: &ForecastTable, selection: &[ForecastVariable]) -> PolarsResult<DataFrame> {
    let times = table
        .rows()
        .iter()
        .map(|row| row.timestamp.format(TIMESTAMP_FORMAT).to_string())
        .collect();
    let series = selection
        .iter()
        .map(|v| (v.label(), table.rows().iter().map(|row| row.value(*v)).collect()))
        .collect();
    wide_frame(times, series)
}

fn history_frame(table: &HistoryTable, selection: &[HistoryVariable]) -> PolarsResult<DataFrame> {
    let times = table
        .rows()
        .iter()
        .map(|row| row.date.format(DATE_FORMAT).to_string())
        .collect();
    let series = selection
        .iter()
        .map(|v| (v.label(), table.rows().iter().map(|row| row.value(*v)).collect()))
        .collect();
    wide_frame(times, series)
}

fn line_chart(data: &DataFrame, kind: ChartKind, labels: &[&'static str]) -> Option<TimeSeriesPlot> {
    let (first, rest) = labels.split_first()?;
    Some(
        TimeSeriesPlot::builder()
            .data(data)
            .x(TIME_LABEL)
            .y(*first)
            .additional_series(rest.to_vec())
            .colors(palette(labels.len()))
            .plot_title(Text::from(kind.title()).size(18))
            .legend(&Legend::new().x(0.05).y(0.95))
            .x_title(TIME_LABEL)
            .build(),
    )
}

/// Temperature over the forecast horizon.
pub fn forecast_temperature_chart(table: &ForecastTable) -> Result<TimeSeriesPlot, ClimaError> {
    let data = forecast_frame(table, &[ForecastVariable::Temperature])?;
    Ok(TimeSeriesPlot::builder()
        .data(&data)
        .x(TIME_LABEL)
        .y(ForecastVariable::Temperature.label())
        .colors(palette(1))
        .plot_title(Text::from(ChartKind::ForecastTemperature.title()).size(18))
        .x_title(TIME_LABEL)
        .y_title(ForecastVariable::Temperature.label())
        .build())
}

/// One line per selected forecast variable. `None` when nothing is selected.
pub fn forecast_variables_chart(
    table: &ForecastTable,
    selection: &[ForecastVariable],
) -> Result<Option<TimeSeriesPlot>, ClimaError> {
    let data = forecast_frame(table, selection)?;
    let labels: Vec<_> = selection.iter().map(|v| v.label()).collect();
    Ok(line_chart(&data, ChartKind::ForecastVariables, &labels))
}

pub fn history_precipitation_chart(table: &HistoryTable) -> Result<TimeSeriesPlot, ClimaError> {
    let data = history_frame(table, &[HistoryVariable::Precipitation])?;
    Ok(TimeSeriesPlot::builder()
        .data(&data)
        .x(TIME_LABEL)
        .y(HistoryVariable::Precipitation.label())
        .colors(vec![Rgb(69, 157, 230)])
        .plot_title(Text::from(ChartKind::HistoryPrecipitation.title()).size(18))
        .x_title(TIME_LABEL)
        .y_title(HistoryVariable::Precipitation.label())
        .build())
}

/// Grouped bars of daily maximum and minimum temperature.
pub fn history_temperatures_chart(table: &HistoryTable) -> Result<BarPlot, ClimaError> {
    let long = table.melt(&[HistoryVariable::TempMax, HistoryVariable::TempMin]);
    let data = long_frame(&long, |date| date.format(DATE_FORMAT).to_string())?;
    Ok(BarPlot::builder()
        .data(&data)
        .labels(TIME_LABEL)
        .values(VALUE_LABEL)
        .group(VARIABLE_LABEL)
        .colors(palette(2))
        .plot_title(Text::from(ChartKind::HistoryTemperatures.title()).size(18))
        .x_title(TIME_LABEL)
        .y_title("Temperatura (°C)")
        .legend(&Legend::new().x(0.05).y(0.95))
        .build())
}

pub fn history_variables_chart(
    table: &HistoryTable,
    selection: &[HistoryVariable],
) -> Result<Option<TimeSeriesPlot>, ClimaError> {
    let data = history_frame(table, selection)?;
    let labels: Vec<_> = selection.iter().map(|v| v.label()).collect();
    Ok(line_chart(&data, ChartKind::HistoryVariables, &labels))
}

/// Renders a plot to a standalone HTML document.
///
/// `plotlars` only writes HTML to a path, so the document goes through a
/// scratch directory and is handed to [`Exporter::write`] from there.
pub fn render_html(plot: &impl Plot) -> Result<Vec<u8>, ClimaError> {
    let dir = tempfile::tempdir().map_err(|e| ClimaError::ExportWrite(std::env::temp_dir(), e))?;
    let path = dir.path().join("chart.html");
    plot.write_html(path.to_string_lossy().to_string());
    std::fs::read(&path).map_err(|e| ClimaError::ExportWrite(path, e))
}

impl Exporter {
    pub async fn write_chart(
        &self,
        kind: ChartKind,
        plot: &impl Plot,
    ) -> Result<PathBuf, ClimaError> {
        let html = render_html(plot)?;
        self.write(kind.file_name(), html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::history_table::DailyHistory;
    use chrono::NaiveDate;

    fn history() -> HistoryTable {
        HistoryTable::new(
            (1..=5)
                .map(|d| DailyHistory {
                    date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    temp_max_c: 28.0 + d as f64,
                    temp_min_c: 16.0,
                    precipitation_mm: d as f64,
                })
                .collect(),
        )
    }

    #[test]
    fn test_empty_selection_has_no_chart() -> Result<(), Box<dyn std::error::Error>> {
        assert!(history_variables_chart(&history(), &[])?.is_none());
        assert!(history_variables_chart(&history(), &HistoryVariable::ALL)?.is_some());
        Ok(())
    }

    #[test]
    fn test_long_frame_shape() -> Result<(), Box<dyn std::error::Error>> {
        let long = history().melt(&[HistoryVariable::TempMax, HistoryVariable::TempMin]);
        let frame = long_frame(&long, |d| d.to_string())?;
        assert_eq!(frame.height(), 10);
        assert_eq!(frame.width(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_chart_is_written_as_html() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let exporter = Exporter::new(dir.path());
        let path = exporter
            .write_chart(
                ChartKind::HistoryPrecipitation,
                &history_precipitation_chart(&history())?,
            )
            .await?;
        assert!(path.ends_with("grafico_precipitacao_clima.html"));
        let html = std::fs::read_to_string(path)?;
        assert!(html.contains("<html"));
        Ok(())
    }
}
