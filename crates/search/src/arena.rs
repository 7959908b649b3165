//! Node arena for one search invocation.
//!
//! Nodes are addressed by stable integer IDs; the open heap and the
//! position lookup both store IDs, never pointers, so a cost update
//! is an in-place field mutation with no aliasing hazards.

use crate::moves::MoveKind;
use voxelnav_core::BlockPos;

/// Stable index of a node within its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The arena slot this ID refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A search node. Mutated in place when a cheaper route to the same
/// position is found; never reallocated, so the heap back-reference
/// stays valid.
#[derive(Debug)]
pub struct Node {
    /// Position this node represents.
    pub pos: BlockPos,
    /// Accumulated cost from the start.
    pub g: f64,
    /// Heuristic estimate to the goal.
    pub h: f64,
    /// Combined cost (`g + h`); the heap key.
    pub f: f64,
    /// Predecessor in the cheapest known route, if any.
    pub parent: Option<NodeId>,
    /// How the agent enters this position from its parent.
    pub kind: MoveKind,
    /// Blocks that must be broken to enter this position.
    pub to_break: Vec<BlockPos>,
    /// Block spaces that must be filled to enter this position.
    pub to_place: Vec<BlockPos>,
    /// Current index in the open heap, or -1 when not enqueued.
    pub heap_index: i32,
}

/// Growable arena owning every node of one search.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node and return its ID.
    pub fn alloc(
        &mut self,
        pos: BlockPos,
        g: f64,
        h: f64,
        parent: Option<NodeId>,
        kind: MoveKind,
        to_break: Vec<BlockPos>,
        to_place: Vec<BlockPos>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            pos,
            g,
            h,
            f: g + h,
            parent,
            kind,
            to_break,
            to_place,
            heap_index: -1,
        });
        id
    }

    /// Shared access to a node.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Walk the parent chain from `id` back to the root and return
    /// the positions in start-to-end order.
    ///
    /// Parents always precede children in discovery order, so the
    /// chain cannot cycle; the assertion guards against a node ever
    /// becoming its own parent.
    pub fn chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            out.push(node_id);
            let parent = self.get(node_id).parent;
            debug_assert!(parent != Some(node_id), "node cannot be its own parent");
            cursor = parent;
        }
        out.reverse();
        out
    }
}
