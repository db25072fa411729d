//! Typed errors for number formatting and feed parsing

use thiserror::Error;

/// Errors raised while configuring price formatting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),
}

/// Errors raised while decoding feed input.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("malformed feed line {line:?}: {reason}")]
    MalformedLine { line: String, reason: String },

    #[error("snapshot parse error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(u16),
}

impl FeedError {
    /// Short label used for the `kind` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::MalformedLine { .. } => "malformed_line",
            FeedError::Snapshot(_) => "snapshot",
            FeedError::Http(_) => "http",
            FeedError::Status(_) => "status",
        }
    }
}
