//! Copy-on-publish snapshot of the world.
//!
//! The poller builds a fresh [`GameSnapshot`] every tick and swaps it in
//! whole, so readers always observe one consistent cycle.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entity::{Entity, Viewer};

/// One poll cycle's view of the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSnapshot {
    /// Poll cycle that produced the snapshot, starting at 1.
    pub frame: u64,
    /// Local viewer state.
    pub viewer: Viewer,
    /// Entities that updated successfully this cycle. Slot positions are
    /// not stable across cycles; use [`Entity::index`].
    pub entities: Vec<Entity>,
}

/// Shared holder of the latest [`GameSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotCell {
    current: RwLock<Arc<GameSnapshot>>,
}

impl SnapshotCell {
    /// Creates a cell holding an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, snapshot: GameSnapshot) {
        let next = Arc::new(snapshot);
        *self.current.write() = next;
    }

    /// Returns the latest snapshot. The lock is held only for the clone of
    /// the `Arc`.
    #[must_use]
    pub fn load(&self) -> Arc<GameSnapshot> {
        let current = self.current.read();
        Arc::clone(&*current)
    }
}
