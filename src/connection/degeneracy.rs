//! Detection of degenerate side node sequences.
//!
//! A side is degenerate when the same node appears in it more than once,
//! which happens when client code collapses an element by reusing a node.
//! Degenerate sides carry no usable orientation, so every classifier entry
//! point rejects them before looking at anything else.

use crate::topology::id::NodeId;
use itertools::Itertools;

#[inline]
fn two_nodes_degenerate(nodes: &[NodeId]) -> bool {
    nodes[0] == nodes[1]
}

#[inline]
fn three_nodes_degenerate(nodes: &[NodeId]) -> bool {
    nodes[0] == nodes[1] || nodes[0] == nodes[2] || nodes[1] == nodes[2]
}

#[inline]
fn four_nodes_degenerate(nodes: &[NodeId]) -> bool {
    nodes[0] == nodes[1]
        || nodes[0] == nodes[2]
        || nodes[0] == nodes[3]
        || nodes[1] == nodes[2]
        || nodes[1] == nodes[3]
        || nodes[2] == nodes[3]
}

/// True when `nodes` contains any repeated node.
///
/// The common side lengths (2, 3, 4) use closed-form pairwise checks; longer
/// sequences fall back to a uniqueness scan. Permuting the input never
/// changes the answer.
///
/// # Panics
/// Debug-panics on sequences shorter than 2 nodes; a side has at least two.
pub fn is_degenerate_side(nodes: &[NodeId]) -> bool {
    debug_assert!(nodes.len() >= 2, "a side has at least two nodes");
    match nodes.len() {
        2 => two_nodes_degenerate(nodes),
        3 => three_nodes_degenerate(nodes),
        4 => four_nodes_degenerate(nodes),
        _ => !nodes.iter().all_unique(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    fn side(ids: &[u64]) -> Vec<NodeId> {
        ids.iter().copied().map(n).collect()
    }

    #[test]
    fn distinct_nodes_are_not_degenerate() {
        assert!(!is_degenerate_side(&side(&[1, 2])));
        assert!(!is_degenerate_side(&side(&[1, 2, 3])));
        assert!(!is_degenerate_side(&side(&[1, 2, 3, 4])));
        assert!(!is_degenerate_side(&side(&[1, 2, 3, 4, 5, 6])));
    }

    #[test]
    fn any_repeat_is_degenerate() {
        assert!(is_degenerate_side(&side(&[9, 9])));
        assert!(is_degenerate_side(&side(&[1, 2, 1])));
        assert!(is_degenerate_side(&side(&[1, 2, 2, 4])));
        assert!(is_degenerate_side(&side(&[1, 2, 3, 1])));
        assert!(is_degenerate_side(&side(&[5, 2, 3, 4, 6, 5])));
    }

    #[test]
    fn order_does_not_matter() {
        let degenerate = [4u64, 2, 4, 3];
        let clean = [4u64, 2, 1, 3];
        for rotation in 0..4 {
            let mut d = degenerate;
            let mut c = clean;
            d.rotate_left(rotation);
            c.rotate_left(rotation);
            assert!(is_degenerate_side(&side(&d)));
            assert!(!is_degenerate_side(&side(&c)));
        }
    }
}
