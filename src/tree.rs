//! Huffman tree construction
//!
//! Greedy bottom-up merging of the two lightest nodes until one root remains.
//! Ties between equal weights are broken by queue order: leaves enter in
//! ascending symbol order, `PSEUDO_EOF` after them, and merged nodes in the
//! order they are created. The same frequencies therefore always yield the
//! same tree and the same header bytes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::counter::FrequencyTable;
use crate::symbol::{Symbol, PSEUDO_EOF};

/// A node of the prefix-code tree. Each internal node owns both children.
#[derive(Debug, Clone)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        left: Box<HuffNode>,
        right: Box<HuffNode>,
        weight: u64,
    },
}

impl HuffNode {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    /// Join two subtrees; the weight is the sum of theirs.
    pub fn internal(left: HuffNode, right: HuffNode) -> Self {
        let weight = left.weight() + right.weight();
        HuffNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
            weight,
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Leaf symbols in preorder (left before right).
    pub fn leaf_symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            HuffNode::Leaf { symbol, .. } => out.push(*symbol),
            HuffNode::Internal { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }

    /// Same shape and same leaf symbols in the same positions. Weights are ignored.
    pub fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal { left: l1, right: r1, .. },
                HuffNode::Internal { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }
}

/// Queue entry: min-heap on weight, then on insertion order.
struct Queued {
    weight: u64,
    order: u32,
    node: HuffNode,
}

impl Eq for Queued {}
impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}
impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Build the code tree for `freq` plus a synthesized `PSEUDO_EOF` of weight 1.
///
/// Empty input yields a lone `PSEUDO_EOF` leaf; a single distinct byte yields
/// a two-leaf tree.
pub fn build_tree(freq: &FrequencyTable) -> HuffNode {
    let mut heap = BinaryHeap::with_capacity(freq.distinct() + 1);
    let mut order = 0u32;
    let mut push = |heap: &mut BinaryHeap<Queued>, node: HuffNode| {
        heap.push(Queued {
            weight: node.weight(),
            order,
            node,
        });
        order += 1;
    };

    for (symbol, weight) in freq.iter() {
        push(&mut heap, HuffNode::leaf(symbol, weight));
    }
    push(&mut heap, HuffNode::leaf(PSEUDO_EOF, 1));

    while let Some(first) = heap.pop() {
        let Some(second) = heap.pop() else {
            return first.node;
        };
        push(&mut heap, HuffNode::internal(first.node, second.node));
    }
    unreachable!("PSEUDO_EOF is always queued")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count;

    fn tree_for(data: &[u8]) -> HuffNode {
        let (freq, _) = count(data).unwrap();
        build_tree(&freq)
    }

    #[test]
    fn test_root_weight_is_total_plus_eof() {
        let tree = tree_for(b"teststring");
        assert_eq!(tree.weight(), 11);
        assert_eq!(tree.leaf_count(), 8);
        assert_eq!(tree.internal_count(), 7);
    }

    #[test]
    fn test_internal_weight_is_sum_of_children() {
        fn check(node: &HuffNode) {
            if let HuffNode::Internal { left, right, weight } = node {
                assert_eq!(*weight, left.weight() + right.weight());
                check(left);
                check(right);
            }
        }
        check(&tree_for(b"hello world hello world hello"));
    }

    #[test]
    fn test_every_symbol_has_one_leaf() {
        let tree = tree_for(b"abracadabra");
        let mut symbols = tree.leaf_symbols();
        symbols.sort_unstable();
        let expected: Vec<Symbol> = vec![
            b'a' as Symbol,
            b'b' as Symbol,
            b'c' as Symbol,
            b'd' as Symbol,
            b'r' as Symbol,
            PSEUDO_EOF,
        ];
        assert_eq!(symbols, expected);
    }

    #[test]
    fn test_single_symbol_gets_two_leaves() {
        let tree = tree_for(b"aaaaaa");
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_empty_input_is_lone_eof() {
        let tree = tree_for(b"");
        assert!(tree.is_leaf());
        assert_eq!(tree.leaf_symbols(), vec![PSEUDO_EOF]);
    }

    #[test]
    fn test_ties_are_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        let a = tree_for(&data);
        let b = tree_for(&data);
        assert!(a.same_shape(&b));
    }

    #[test]
    fn test_same_shape_detects_swapped_leaves() {
        let a = HuffNode::internal(HuffNode::leaf(1, 1), HuffNode::leaf(2, 1));
        let b = HuffNode::internal(HuffNode::leaf(2, 1), HuffNode::leaf(1, 1));
        assert!(!a.same_shape(&b));
        assert!(a.same_shape(&a.clone()));
    }
}
