use airfog_domain::adv::AdvError;
use thiserror::Error;

/// Everything that can go wrong between a "send" tap and the backend's
/// answer. Each variant's message is the status string shown to the
/// user; nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("observation has no peripheral identity, nothing to relay")]
    MissingPeripheralId,

    #[error("advertisement could not be re-encoded: {0}")]
    Encode(#[from] AdvError),

    #[error("invalid relay endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("relay request could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("relay response was not a valid record: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("relay backend unreachable: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("relay backend timed out")]
    Timeout,

    #[error("relay backend rejected the submission ({status}): {body}")]
    RemoteRejected { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;
