//! Sports Feed
//!
//! Fetches team and game payloads from two upstream endpoints, validates them into
//! typed records and publishes the latest snapshot for the HTTP layer to serve.
//! A single background task refreshes the snapshot on a fixed interval.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod scheduler;
pub mod store;

pub use config::{FeedConfig, SchedulerConfig, SourceConfig};
pub use error::{FeedError, FeedResult, RecordKind};
pub use fetcher::{HttpFetcher, SourceFetcher};
pub use models::*;
pub use normalizer::normalize;
pub use scheduler::RefreshScheduler;
pub use store::{FeedState, SnapshotStore};

/// Per-request timeout for upstream fetches
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
