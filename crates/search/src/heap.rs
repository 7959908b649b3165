//! Binary min-heap over arena nodes with decrease-key support.
//!
//! The backing array is 1-indexed so parent/child arithmetic stays
//! cheap (`i / 2`, `2 * i`, `2 * i + 1`). Each node stores its
//! current heap index, which makes a cost decrease an O(log n)
//! sift-up instead of an O(n) scan.

use crate::arena::{NodeArena, NodeId};

/// Min-heap of node IDs keyed by each node's combined cost.
#[derive(Debug)]
pub struct OpenHeap {
    // Slot 0 is a sentinel and never read.
    heap: Vec<NodeId>,
}

impl OpenHeap {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            heap: vec![NodeId(u32::MAX)],
        }
    }

    /// Number of enqueued nodes.
    pub fn len(&self) -> usize {
        self.heap.len() - 1
    }

    /// Whether the heap holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.heap.len() == 1
    }

    /// The minimum-cost node without removing it.
    pub fn peek(&self) -> Option<NodeId> {
        self.heap.get(1).copied()
    }

    /// Insert a node. The node must not already be enqueued.
    pub fn push(&mut self, arena: &mut NodeArena, id: NodeId) {
        debug_assert!(arena.get(id).heap_index < 0, "node already enqueued");
        let index = self.heap.len();
        self.heap.push(id);
        arena.get_mut(id).heap_index = index as i32;
        self.sift_up(arena, index);
    }

    /// Remove and return the minimum-cost node.
    pub fn pop(&mut self, arena: &mut NodeArena) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        let top = self.heap[1];
        arena.get_mut(top).heap_index = -1;
        let last = self.heap.pop().expect("heap is non-empty");
        if !self.is_empty() {
            self.heap[1] = last;
            arena.get_mut(last).heap_index = 1;
            self.sift_down(arena, 1);
        }
        Some(top)
    }

    /// Restore heap order after `id`'s combined cost decreased.
    ///
    /// No-op when the node is not currently enqueued.
    pub fn decrease_key(&mut self, arena: &mut NodeArena, id: NodeId) {
        let index = arena.get(id).heap_index;
        if index < 0 {
            return;
        }
        self.sift_up(arena, index as usize);
    }

    fn key(&self, arena: &NodeArena, index: usize) -> f64 {
        arena.get(self.heap[index]).f
    }

    fn swap(&mut self, arena: &mut NodeArena, a: usize, b: usize) {
        self.heap.swap(a, b);
        arena.get_mut(self.heap[a]).heap_index = a as i32;
        arena.get_mut(self.heap[b]).heap_index = b as i32;
    }

    fn sift_up(&mut self, arena: &mut NodeArena, mut index: usize) {
        while index > 1 {
            let parent = index / 2;
            if self.key(arena, index) >= self.key(arena, parent) {
                break;
            }
            self.swap(arena, index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, arena: &mut NodeArena, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.key(arena, left) < self.key(arena, smallest) {
                smallest = left;
            }
            if right < len && self.key(arena, right) < self.key(arena, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap(arena, index, smallest);
            index = smallest;
        }
    }
}

impl Default for OpenHeap {
    fn default() -> Self {
        Self::new()
    }
}
