//! Snapshot encoding and statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::world::WorldState;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Serialize the full world once; the result is shared by every recipient.
pub fn encode(state: &WorldState) -> Result<Arc<str>, SnapshotError> {
    serde_json::to_string(state)
        .map(Arc::from)
        .map_err(SnapshotError::Encode)
}

/// Parse a snapshot as a client would
pub fn decode(payload: &str) -> Result<WorldState, SnapshotError> {
    serde_json::from_str(payload).map_err(SnapshotError::Decode)
}

/// Running snapshot counters, readable from the health endpoint
#[derive(Debug, Default)]
pub struct SnapshotStats {
    total_snapshots: AtomicU64,
    total_bytes: AtomicU64,
    last_bytes: AtomicU64,
}

impl SnapshotStats {
    pub fn record(&self, bytes: usize) {
        self.total_snapshots.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        self.last_bytes.store(bytes as u64, Ordering::Relaxed);
    }

    pub fn total_snapshots(&self) -> u64 {
        self.total_snapshots.load(Ordering::Relaxed)
    }

    pub fn last_bytes(&self) -> u64 {
        self.last_bytes.load(Ordering::Relaxed)
    }

    pub fn avg_bytes(&self) -> u64 {
        let n = self.total_snapshots();
        if n == 0 {
            0
        } else {
            self.total_bytes.load(Ordering::Relaxed) / n
        }
    }
}
