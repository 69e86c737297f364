//! Error types for the sports feed

use std::fmt;
use thiserror::Error;

/// Result type alias for feed operations
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Which schema a record was validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Team,
    Game,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Team => write!(f, "team"),
            RecordKind::Game => write!(f, "game"),
        }
    }
}

/// Errors that can occur while configuring or running a refresh cycle.
///
/// Transport failures are not represented here: the fetcher records them per source
/// inside the raw snapshot instead of returning them.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record did not match its schema
    #[error("Invalid {kind} record at index {index} from {url}: {reason}")]
    Validation { kind: RecordKind, url: String, index: usize, reason: String },

    /// The payload envelope itself had the wrong shape
    #[error("Malformed payload from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl FeedError {
    pub fn config(msg: impl Into<String>) -> Self {
        FeedError::Config(msg.into())
    }
}
