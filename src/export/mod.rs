//! Files offered for download: CSV tables and, with the `charts` feature,
//! interactive HTML charts.

#[cfg(feature = "charts")]
pub mod charts;
pub mod csv;

use crate::types::date_range::DateRange;
use crate::utils::ensure_dir_exists;
use crate::ClimaError;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

pub const FORECAST_CSV_FILE: &str = "clima_lavras_previsao.csv";

/// `clima_lavras_<start>_<end>.csv` with compact dates.
pub fn history_csv_file_name(range: &DateRange) -> String {
    format!(
        "clima_lavras_{}_{}.csv",
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d")
    )
}

/// The charts the dashboard can export, one document each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    ForecastTemperature,
    ForecastVariables,
    HistoryPrecipitation,
    HistoryTemperatures,
    HistoryVariables,
}

impl ChartKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::ForecastTemperature => "grafico_Temperatura.html",
            ChartKind::ForecastVariables => "grafico_previsao_clima.html",
            ChartKind::HistoryPrecipitation => "grafico_precipitacao_clima.html",
            ChartKind::HistoryTemperatures => "grafico_TempMáx_TempMín_clima.html",
            ChartKind::HistoryVariables => "grafico_clima.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::ForecastTemperature => "📈 Temperatura ao longo do tempo",
            ChartKind::ForecastVariables => "📊 Temperatura, Umidade e Vento",
            ChartKind::HistoryPrecipitation => "🌧️ Precipitação",
            ChartKind::HistoryTemperatures => "🌡️ Temperatura Máxima e Mínima por Dia",
            ChartKind::HistoryVariables => "📊 Temperatura Máxima, Mínima e Precipitação",
        }
    }
}

/// Writes export files into one directory.
///
/// Each file is written to a temporary file next to its destination first and
/// then renamed over it, so readers never see a half-written export.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Writes `contents` to `file_name` inside the export directory,
    /// creating the directory if needed. Returns the final path.
    pub async fn write(&self, file_name: &str, contents: Vec<u8>) -> Result<PathBuf, ClimaError> {
        ensure_dir_exists(&self.dir).await?;
        let dir = self.dir.clone();
        let target = self.path_for(file_name);
        let target_clone = target.clone();

        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&dir)
                .map_err(|e| ClimaError::ExportWrite(target_clone.clone(), e))?;
            temp_file
                .write_all(&contents)
                .map_err(|e| ClimaError::ExportWrite(target_clone.clone(), e))?;
            temp_file
                .flush()
                .map_err(|e| ClimaError::ExportWrite(target_clone.clone(), e))?;
            temp_file
                .persist(&target_clone)
                .map_err(|e| ClimaError::ExportWrite(target_clone.clone(), e.error))?;
            Ok::<(), ClimaError>(())
        })
        .await??;

        info!("Exported {}", target.display());
        Ok(target)
    }
}
