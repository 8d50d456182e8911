//! The coincidence classifier.
//!
//! Three entry points answer the same question, "is this side-sharing pair
//! coincident rather than neighboring?", from three amounts of information:
//!
//! - [`is_coincident_connection`]: node sequences only. Treats every
//!   shell-shell pair as coincident, which over-reports paved shell
//!   arrangements; kept for callers that have no side ordinal for the other
//!   element.
//! - [`is_coincident_connection_precise`]: node sequences plus the other
//!   element's side ordinal, enough to tell stacked shells from paved ones.
//! - [`is_coincident_connection_resolved`]: permutation tokens only, for
//!   pairs whose other element lives on another rank.
//!
//! All three reject degenerate input (where visible) and mixed
//! shell/non-shell pairs, and all three are pure.

use crate::connection::ResolvedSide;
use crate::connection::degeneracy::is_degenerate_side;
use crate::connection::pairing::{TopologyPairing, pair_topologies};
use crate::connection::polarity::{is_positive_side_match, resolved_polarity_matches};
use crate::connection::shell::{ShellConnection, shell_connection, shell_connection_resolved};
use crate::mesh::MeshConnectivity;
use crate::topology::cell::{CellTopology, SideOrdinal};
use crate::topology::id::{ElementId, NodeId};

/// Coarse classification: no side ordinal for the other element.
///
/// A degenerate `other_side_nodes` sequence is never coincident. Both
/// elements shells is always reported coincident here, even for paved
/// arrangements; use the precise variant when the other side ordinal is
/// known.
pub fn is_coincident_connection<M: MeshConnectivity>(
    mesh: &M,
    local_elem: ElementId,
    local_side: SideOrdinal,
    other_topology: CellTopology,
    other_side_nodes: &[NodeId],
) -> bool {
    if is_degenerate_side(other_side_nodes) {
        return false;
    }
    is_nondegenerate_coincident_connection(
        mesh,
        local_elem,
        local_side,
        other_topology,
        other_side_nodes,
    )
}

fn is_nondegenerate_coincident_connection<M: MeshConnectivity>(
    mesh: &M,
    local_elem: ElementId,
    local_side: SideOrdinal,
    other_topology: CellTopology,
    other_side_nodes: &[NodeId],
) -> bool {
    let local_topology = mesh.element_topology(local_elem);
    match pair_topologies(local_topology, other_topology) {
        TopologyPairing::BothShell => true,
        TopologyPairing::NeitherShell => {
            is_positive_side_match(mesh, local_elem, local_side, other_side_nodes)
        }
        TopologyPairing::Mixed => false,
    }
}

/// Precise classification: the other element's side ordinal is known, so
/// shell pairs resolve through their arrangement and only
/// [`ShellConnection::Stacked`] counts as coincident.
pub fn is_coincident_connection_precise<M: MeshConnectivity>(
    mesh: &M,
    local_elem: ElementId,
    local_side: SideOrdinal,
    other_topology: CellTopology,
    other_side_nodes: &[NodeId],
    other_side: SideOrdinal,
) -> bool {
    if is_degenerate_side(other_side_nodes) {
        return false;
    }
    is_nondegenerate_coincident_connection_precise(
        mesh,
        local_elem,
        local_side,
        other_topology,
        other_side_nodes,
        other_side,
    )
}

fn is_nondegenerate_coincident_connection_precise<M: MeshConnectivity>(
    mesh: &M,
    local_elem: ElementId,
    local_side: SideOrdinal,
    other_topology: CellTopology,
    other_side_nodes: &[NodeId],
    other_side: SideOrdinal,
) -> bool {
    let local_topology = mesh.element_topology(local_elem);
    match pair_topologies(local_topology, other_topology) {
        TopologyPairing::BothShell => {
            let same_polarity =
                is_positive_side_match(mesh, local_elem, local_side, other_side_nodes);
            shell_connection(
                local_topology,
                local_side,
                other_topology,
                other_side,
                same_polarity,
            ) == ShellConnection::Stacked
        }
        TopologyPairing::NeitherShell => {
            is_positive_side_match(mesh, local_elem, local_side, other_side_nodes)
        }
        TopologyPairing::Mixed => false,
    }
}

/// Token classification for cross-rank pairs.
///
/// Degeneracy is not re-checked here: node identities are not available,
/// and [`resolve_side_attachment`](crate::connection::resolve_side_attachment)
/// refuses to produce tokens for degenerate sides in the first place.
/// Symmetric in its arguments, so the two owning ranks always reach the
/// same verdict.
pub fn is_coincident_connection_resolved(local: ResolvedSide, other: ResolvedSide) -> bool {
    match pair_topologies(local.topology, other.topology) {
        TopologyPairing::BothShell => {
            shell_connection_resolved(local, other) == ShellConnection::Stacked
        }
        TopologyPairing::NeitherShell => resolved_polarity_matches(local, other),
        TopologyPairing::Mixed => false,
    }
}

/// One locally classifiable candidate pair, owned so batches can be built
/// ahead of time and handed to worker threads.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SideCandidate {
    /// Element on this rank.
    pub local_element: ElementId,
    /// Side of the local element taking part in the connection.
    pub local_side: SideOrdinal,
    /// Topology of the other element.
    pub other_topology: CellTopology,
    /// The other element's side nodes, in its traversal order.
    pub other_side_nodes: Vec<NodeId>,
    /// Side ordinal of the other element.
    pub other_side: SideOrdinal,
}

/// Classifies a batch of candidates with the precise variant, preserving
/// input order.
pub fn classify_candidates<M: MeshConnectivity>(
    mesh: &M,
    candidates: &[SideCandidate],
) -> Vec<bool> {
    candidates
        .iter()
        .map(|c| {
            is_coincident_connection_precise(
                mesh,
                c.local_element,
                c.local_side,
                c.other_topology,
                &c.other_side_nodes,
                c.other_side,
            )
        })
        .collect()
}

/// Parallel batch classification; verdicts land at the same indices as the
/// serial version.
#[cfg(feature = "rayon")]
pub fn par_classify_candidates<M: MeshConnectivity + Sync>(
    mesh: &M,
    candidates: &[SideCandidate],
) -> Vec<bool> {
    use rayon::prelude::*;
    candidates
        .par_iter()
        .map(|c| {
            is_coincident_connection_precise(
                mesh,
                c.local_element,
                c.local_side,
                c.other_topology,
                &c.other_side_nodes,
                c.other_side,
            )
        })
        .collect()
}
