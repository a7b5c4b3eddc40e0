use reqwest::StatusCode;
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error object returned by the API on non-success statuses.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    /// Builds a status error, preferring the upstream `message` when the body parses.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(ApiErrorBody {
                code: Some(code),
                message,
            }) => format!("{message} ({code})"),
            Ok(ApiErrorBody { code: None, message }) => message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
        };

        StoreError::Status { status, message }
    }
}
