//! Huffman tree construction
//!
//! Greedy minimum-frequency merging over a binary heap. Ties between equal
//! frequencies are broken by insertion order: leaves are numbered in
//! ascending symbol value, and every merged node takes the next number
//! after that. The lower number is selected first and becomes the left
//! child, so the same table always yields the same tree.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn frequency(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { frequency, .. } | HuffmanNode::Internal { frequency, .. } => {
                *frequency
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// The symbol of a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(&HuffmanNode, &HuffmanNode)> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some((left, right)),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self.children() {
            None => 1,
            Some((l, r)) => l.leaf_count() + r.leaf_count(),
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        match self.children() {
            None => 0,
            Some((l, r)) => 1 + l.height().max(r.height()),
        }
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Result<HuffmanNode> {
        let frequency = left
            .frequency()
            .checked_add(right.frequency())
            .ok_or(HuffmanError::FrequencyOverflow)?;
        Ok(HuffmanNode::Internal {
            frequency,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Heap slot pairing a node with its tie-break order.
#[derive(Debug)]
struct Pending {
    frequency: u64,
    order: usize,
    node: HuffmanNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // reversed: BinaryHeap is a max-heap and we want the smallest first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .frequency
            .cmp(&self.frequency)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Build the Huffman tree for `table` and return its root.
///
/// A table with a single symbol produces a lone leaf. An empty table
/// fails with [`HuffmanError::EmptyInput`].
pub fn build_huffman_tree(table: &FrequencyTable) -> Result<HuffmanNode> {
    if table.is_empty() {
        return Err(HuffmanError::EmptyInput);
    }

    let mut heap: BinaryHeap<Pending> = table
        .iter()
        .enumerate()
        .map(|(order, (symbol, frequency))| Pending {
            frequency,
            order,
            node: HuffmanNode::Leaf { symbol, frequency },
        })
        .collect();
    let mut next_order = heap.len();

    loop {
        let first = heap.pop().ok_or(HuffmanError::EmptyInput)?;
        let Some(second) = heap.pop() else {
            let root = first.node;
            debug!(
                leaves = root.leaf_count(),
                height = root.height(),
                frequency = root.frequency(),
                "built huffman tree"
            );
            return Ok(root);
        };
        let node = HuffmanNode::merge(first.node, second.node)?;
        heap.push(Pending {
            frequency: node.frequency(),
            order: next_order,
            node,
        });
        next_order += 1;
    }
}
