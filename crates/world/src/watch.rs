//! World-change watchers: chunk-load tracking and block-update
//! tracking. The path executor consults these to invalidate an
//! in-flight path when the terrain it depends on changes.

use crate::ChunkPos;
use std::collections::{BTreeSet, VecDeque};
use voxelnav_core::BlockPos;

/// Tracks which chunk columns are currently loaded.
#[derive(Debug, Default)]
pub struct ChunkTracker {
    loaded: BTreeSet<ChunkPos>,
}

impl ChunkTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk as loaded.
    pub fn mark_loaded(&mut self, pos: ChunkPos) {
        if self.loaded.insert(pos) {
            tracing::debug!(chunk_x = pos.x, chunk_z = pos.z, "chunk loaded");
        }
    }

    /// Record a chunk as unloaded.
    pub fn mark_unloaded(&mut self, pos: ChunkPos) {
        if self.loaded.remove(&pos) {
            tracing::debug!(chunk_x = pos.x, chunk_z = pos.z, "chunk unloaded");
        }
    }

    /// Whether the chunk column is loaded.
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.loaded.contains(&pos)
    }

    /// Whether the chunk column containing the block is loaded.
    pub fn is_block_loaded(&self, pos: BlockPos) -> bool {
        self.is_loaded(ChunkPos::containing(pos))
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Bounded queue of recently mutated block positions.
///
/// The executor drains this once per tick and cancels the in-flight
/// path when a mutation touches terrain the path depends on.
#[derive(Debug, Clone)]
pub struct BlockUpdateTracker {
    updates: VecDeque<BlockPos>,
    capacity: usize,
}

impl BlockUpdateTracker {
    /// Default capacity; old updates are dropped beyond this.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Create a tracker with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a tracker holding at most `capacity` pending updates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            updates: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a block mutation.
    pub fn record(&mut self, pos: BlockPos) {
        if self.updates.len() == self.capacity {
            self.updates.pop_front();
        }
        self.updates.push_back(pos);
    }

    /// Take all pending updates, oldest first.
    pub fn drain(&mut self) -> Vec<BlockPos> {
        self.updates.drain(..).collect()
    }

    /// Number of pending updates.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Whether there are no pending updates.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl Default for BlockUpdateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_tracker_answers_block_queries() {
        let mut tracker = ChunkTracker::new();
        tracker.mark_loaded(ChunkPos::new(0, 0));
        assert!(tracker.is_block_loaded(BlockPos::new(7, 64, 12)));
        assert!(!tracker.is_block_loaded(BlockPos::new(-1, 64, 0)));
        tracker.mark_unloaded(ChunkPos::new(0, 0));
        assert!(!tracker.is_block_loaded(BlockPos::new(7, 64, 12)));
    }

    #[test]
    fn update_tracker_clones_with_pending_updates() {
        let mut tracker = BlockUpdateTracker::new();
        tracker.record(BlockPos::new(4, 64, 4));
        let mut copy = tracker.clone();
        assert_eq!(copy.drain(), vec![BlockPos::new(4, 64, 4)]);
        assert_eq!(tracker.len(), 1, "the original keeps its queue");
    }

    #[test]
    fn update_tracker_drains_in_order_and_bounds_growth() {
        let mut tracker = BlockUpdateTracker::with_capacity(2);
        tracker.record(BlockPos::new(1, 0, 0));
        tracker.record(BlockPos::new(2, 0, 0));
        tracker.record(BlockPos::new(3, 0, 0));
        let drained = tracker.drain();
        assert_eq!(
            drained,
            vec![BlockPos::new(2, 0, 0), BlockPos::new(3, 0, 0)]
        );
        assert!(tracker.is_empty());
    }
}
