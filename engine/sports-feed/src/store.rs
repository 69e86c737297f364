//! In-memory holder for the latest snapshot pair
//!
//! The raw and normalized snapshots are published together as one immutable
//! [`FeedState`]. Readers clone an `Arc` under a short read lock, so a reader sees
//! either the previous pair or the new one and never waits on a refresh cycle.

use crate::models::{NormalizedSnapshot, RawSnapshot};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// One published refresh result
#[derive(Debug, Clone)]
pub struct FeedState {
    pub raw: RawSnapshot,
    pub normalized: NormalizedSnapshot,
    pub refreshed_at: DateTime<Utc>,
}

impl FeedState {
    pub fn new(raw: RawSnapshot, normalized: NormalizedSnapshot) -> Self {
        Self { raw, normalized, refreshed_at: Utc::now() }
    }
}

/// Single-writer, many-reader cell holding the current [`FeedState`]
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<FeedState>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current state wholesale
    pub fn publish(&self, state: FeedState) {
        let previous = self.current.write().replace(Arc::new(state));
        // Free the old state after the lock is released.
        drop(previous);
    }

    /// The current state, if any refresh has completed
    pub fn latest(&self) -> Option<Arc<FeedState>> {
        self.current.read().clone()
    }
}
