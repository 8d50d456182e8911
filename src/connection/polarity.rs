//! Polarity of side attachments.
//!
//! Polarity asks one question: do two traversals of the same side run in the
//! same direction? It comes in two forms. The node-sequence form compares a
//! candidate sequence against an element's own side nodes, and is what the
//! local classifier variants use. The token form compares two
//! [`ResolvedSide`] descriptors whose permutations were resolved against a
//! common reference, and is what the cross-rank variant uses. The two forms
//! agree whenever both apply, because polarity composes through the side's
//! dihedral group.

use crate::connection::ResolvedSide;
use crate::connection::degeneracy::is_degenerate_side;
use crate::mesh::MeshConnectivity;
use crate::topology::cell::SideOrdinal;
use crate::topology::id::{ElementId, NodeId};
use crate::topology::side::SideEquivalence;

/// Compares `candidate` against the side nodes of `elem`'s side `side`.
///
/// # Panics
/// Debug-panics when `candidate` is degenerate or its length does not match
/// the side's node count; both are caller bugs (the classifier entry points
/// screen for degeneracy first).
pub fn side_equivalence<M: MeshConnectivity>(
    mesh: &M,
    elem: ElementId,
    side: SideOrdinal,
    candidate: &[NodeId],
) -> SideEquivalence {
    debug_assert!(
        !is_degenerate_side(candidate),
        "polarity is undefined for degenerate node sequences"
    );
    let topology = mesh.element_topology(elem);
    let reference = topology.side_nodes(mesh.element_nodes(elem), side);
    topology.side_topology(side).equivalence(&reference, candidate)
}

/// True when `candidate` describes the same side as `elem`'s side `side`
/// and traverses it in the same direction.
#[inline]
pub fn is_positive_side_match<M: MeshConnectivity>(
    mesh: &M,
    elem: ElementId,
    side: SideOrdinal,
    candidate: &[NodeId],
) -> bool {
    side_equivalence(mesh, elem, side, candidate).is_positive()
}

/// Token form: do two resolved attachments traverse their shared side in
/// the same direction?
///
/// Both descriptors must have been resolved against the same reference
/// ordering; that is the exchange layer's contract.
#[inline]
pub fn resolved_polarity_matches(a: ResolvedSide, b: ResolvedSide) -> bool {
    a.is_positive_polarity() == b.is_positive_polarity()
}

/// Resolves how `elem` attaches to a side whose nodes are given by
/// `side_entity_nodes`, producing the descriptor the cross-rank classifier
/// consumes.
///
/// Returns `None` when the reference sequence is degenerate or the element's
/// side is not a dihedral rearrangement of it; such sides never become
/// remote candidates.
pub fn resolve_side_attachment<M: MeshConnectivity>(
    mesh: &M,
    elem: ElementId,
    side: SideOrdinal,
    side_entity_nodes: &[NodeId],
) -> Option<ResolvedSide> {
    if is_degenerate_side(side_entity_nodes) {
        return None;
    }
    let topology = mesh.element_topology(elem);
    let attached = topology.side_nodes(mesh.element_nodes(elem), side);
    topology
        .side_topology(side)
        .permutation_of(side_entity_nodes, &attached)
        .map(|p| ResolvedSide::new(topology, side, p))
}
