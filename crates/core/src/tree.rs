//! Huffman tree construction.
//!
//! Nodes live in a flat arena (`Vec<Node>`) and refer to each other by
//! index. Leaves never own symbol data: they hold the index of their
//! `SymbolEntry` in the `Alphabet` the tree was built from, so the tree can
//! be dropped without touching the alphabet.
//!
//! # Merge order
//!
//! The priority queue is a binary min-heap with a total order:
//! 1. frequency, ascending
//! 2. leaves before internal nodes of equal frequency
//! 3. byte value for leaves, creation order for internal nodes
//!
//! The first node popped becomes the left child (bit 0), the second the
//! right child (bit 1). Identical input therefore always yields the same
//! tree and the same codes.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, TryReserveError};

use crate::alphabet::Alphabet;
use crate::error::{Error, Result};

/// Index of a node in a `HuffmanTree` arena.
pub type NodeId = usize;

/// A node in the Huffman tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A symbol; `entry` indexes the alphabet the tree was built from
    Leaf { entry: usize, freq: usize },
    /// Two subtrees; `freq` is the sum of theirs
    Internal {
        freq: usize,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    /// Weight carried by the node.
    pub fn freq(&self) -> usize {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Queue ordering key. Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    freq: usize,
    /// `false` for leaves, so leaves sort first
    internal: bool,
    /// Byte value for leaves, node id (creation order) for internal nodes
    tiebreak: usize,
    node: NodeId,
}

/// Min-priority queue of tree nodes used during construction.
#[derive(Debug, Default)]
pub struct NodeQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
}

impl NodeQueue {
    /// Create a queue with room for `capacity` nodes.
    pub fn try_with_capacity(capacity: usize) -> std::result::Result<Self, TryReserveError> {
        let mut heap = BinaryHeap::new();
        heap.try_reserve(capacity)?;
        Ok(Self { heap })
    }

    /// Queue a leaf for the symbol `symbol`.
    pub fn push_leaf(&mut self, node: NodeId, freq: usize, symbol: u8) {
        self.heap.push(Reverse(QueueEntry {
            freq,
            internal: false,
            tiebreak: symbol as usize,
            node,
        }));
    }

    /// Queue an internal node.
    pub fn push_internal(&mut self, node: NodeId, freq: usize) {
        self.heap.push(Reverse(QueueEntry {
            freq,
            internal: true,
            tiebreak: node,
            node,
        }));
    }

    /// Remove the lowest-ranked node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse(entry)| entry.node)
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Arena-backed Huffman tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a Huffman tree with one leaf per alphabet entry.
    ///
    /// For a single-symbol alphabet the root is that leaf; no merge happens.
    ///
    /// # Errors
    /// - `Error::AllocationFailed` if the arena or queue cannot be reserved
    /// - `Error::TreeConstructionFailed` for an empty alphabet
    pub fn build(alphabet: &Alphabet) -> Result<Self> {
        let leaves = alphabet.len();
        let mut nodes: Vec<Node> = Vec::new();
        nodes.try_reserve_exact((2 * leaves).saturating_sub(1))?;
        let mut queue = NodeQueue::try_with_capacity(leaves)?;

        for (entry, symbol) in alphabet.iter().enumerate() {
            let id = nodes.len();
            nodes.push(Node::Leaf {
                entry,
                freq: symbol.freq,
            });
            queue.push_leaf(id, symbol.freq, symbol.symbol);
        }

        while queue.len() > 1 {
            let left = queue.pop().ok_or(Error::TreeConstructionFailed)?;
            let right = queue.pop().ok_or(Error::TreeConstructionFailed)?;
            let freq = nodes[left].freq() + nodes[right].freq();

            let id = nodes.len();
            nodes.push(Node::Internal { freq, left, right });
            queue.push_internal(id, freq);
        }

        let root = queue.pop().ok_or(Error::TreeConstructionFailed)?;
        Ok(Self { nodes, root })
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Total number of nodes (always `2 * leaves - 1`).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A built tree always has a root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }
}
