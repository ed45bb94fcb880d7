use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("GOVEE_API_KEY is missing")]
    MissingApiKey,

    #[error("GOVEE_API_KEY contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Reasons a single `GOVEE_DEVICES` entry is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("expected six address octets followed by a model, got {0} field(s)")]
    TooFewFields(usize),

    #[error("unexpected trailing field(s) after model: {0}")]
    TrailingFields(String),

    #[error("invalid address octet {0:?}")]
    InvalidOctet(String),

    #[error("model code is empty")]
    EmptyModel,
}

pub type Result<T> = std::result::Result<T, Error>;
