use thiserror::Error;

/// Why a single upstream poll produced no update.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("upstream payload could not be decoded: {0}")]
    Decode(String),

    #[error("upstream transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("feed misconfigured: {0}")]
    Config(String),
}

impl FeedError {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Timeout => "timeout",
            FeedError::Status { .. } => "status",
            FeedError::Decode(_) => "decode",
            FeedError::Transport(_) => "transport",
            FeedError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if err.is_decode() {
            FeedError::Decode(err.to_string())
        } else {
            FeedError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err.to_string())
    }
}

/// Why a message could not be handed to a subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber connection closed")]
    Closed,

    #[error("subscriber is not draining its queue")]
    Lagging,
}
