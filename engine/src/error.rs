use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid {field} `{value}` in record {index}")]
    InvalidDate {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("invalid record {index}: {reason}")]
    InvalidRecord { index: usize, reason: &'static str },

    #[error("malformed event data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
