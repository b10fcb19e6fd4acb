use thiserror::Error;

/// Failure to obtain an observation from one source for one city.
///
/// Never fatal: the monitor loop logs it and skips the city/source pair
/// until the next polling cycle.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The payload arrived but did not have the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("climate report has no max-temperature line")]
    MissingMaximumLine,

    #[error("unparseable max-temperature token: {0:?}")]
    BadTemperature(String),

    #[error("unrecognized occurrence-time token: {0:?}")]
    BadTimeToken(String),

    #[error("no max temperature reported for today")]
    NoDataForToday,
}

/// Failure to deliver a desktop alert. Logged, never fatal.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("desktop notification failed: {0}")]
    Desktop(#[from] notify_rust::error::Error),

    #[error("console notification failed: {0}")]
    Console(#[from] std::io::Error),
}
