use thiserror::Error;

/// Everything that can go wrong while turning an Open-Meteo call into a table.
///
/// At the crate boundary every variant is reported as
/// [`crate::ClimaError::DataUnavailable`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    // Open-Meteo answers bad parameters with {"error": true, "reason": "..."}
    #[error("Open-Meteo rejected the request for {url} ({status}): {reason}")]
    ApiRejected {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to parse JSON response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Series '{series}' has {found} values but 'time' has {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid timestamp '{value}' in response")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
