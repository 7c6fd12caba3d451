//! Portuguese text for the dashboard: period intro, metric lines and the
//! story the history tells.

use crate::statistics::DerivedStatistics;
use crate::types::date_range::DateRange;
use crate::types::weekday::weekday_label;
use chrono::NaiveDate;

/// Total precipitation above which a period counts as rainy.
pub const ABUNDANT_RAIN_THRESHOLD_MM: f64 = 100.0;

pub const INVALID_RANGE_MESSAGE: &str = "⚠️ A data de início deve ser anterior à data final.";
pub const NO_DATA_MESSAGE: &str = "Nenhum dado disponível para o período selecionado.";

/// `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy (Dow)`.
pub fn format_date_with_weekday(date: NaiveDate) -> String {
    format!("{} ({})", format_date(date), weekday_label(date))
}

pub fn period_intro(range: &DateRange) -> String {
    format!(
        "📖 Entre {} e {}, os dados revelam como o clima de Lavras se comportou. \
         Vamos explorar a história que o céu contou nesse período.",
        format_date(range.start),
        format_date(range.end)
    )
}

/// A headline figure, e.g. `Temp. Máxima Média: 29.4 °C`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

pub fn metrics(stats: &DerivedStatistics) -> [Metric; 3] {
    [
        Metric {
            label: "Temp. Máxima Média",
            value: format!("{:.1} °C", stats.avg_temp_max),
        },
        Metric {
            label: "Temp. Mínima Média",
            value: format!("{:.1} °C", stats.avg_temp_min),
        },
        Metric {
            label: "Precipitação Total",
            value: format!("{:.1} mm", stats.total_precipitation),
        },
    ]
}

/// Whether a period was rainy overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainfallVerdict {
    Abundant,
    Scarce,
}

impl RainfallVerdict {
    pub fn for_total(total_precipitation_mm: f64) -> Self {
        if total_precipitation_mm > ABUNDANT_RAIN_THRESHOLD_MM {
            RainfallVerdict::Abundant
        } else {
            RainfallVerdict::Scarce
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RainfallVerdict::Abundant => {
                "💡 Este período foi marcado por chuvas abundantes, acima de 100 mm no total."
            }
            RainfallVerdict::Scarce => {
                "💡 Este período teve pouca chuva, com menos de 100 mm acumulados."
            }
        }
    }
}

/// The "what the data tells" section.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub hottest: String,
    pub coldest: String,
    pub wettest: String,
    pub verdict: RainfallVerdict,
}

impl Narrative {
    pub fn from_statistics(stats: &DerivedStatistics) -> Self {
        Self {
            hottest: format!(
                "🔥 O dia mais quente foi em {}, com máxima de {} °C.",
                format_date_with_weekday(stats.hottest_day.date),
                stats.hottest_day.temp_max_c
            ),
            coldest: format!(
                "❄️ O dia mais frio foi em {}, com mínima de {} °C.",
                format_date_with_weekday(stats.coldest_day.date),
                stats.coldest_day.temp_min_c
            ),
            wettest: format!(
                "🌧️ O dia mais chuvoso foi em {}, com precipitação de {} mm.",
                format_date_with_weekday(stats.wettest_day.date),
                stats.wettest_day.precipitation_mm
            ),
            verdict: RainfallVerdict::for_total(stats.total_precipitation),
        }
    }

    pub fn lines(&self) -> [&str; 4] {
        [
            self.hottest.as_str(),
            self.coldest.as_str(),
            self.wettest.as_str(),
            self.verdict.message(),
        ]
    }
}
