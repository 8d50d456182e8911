//! Classification of element-to-element side connections.
//!
//! Two elements that share the nodes of a side are not necessarily
//! neighbors: the sharing may come from duplicated geometry or from shells
//! stacked on the same surface. This module decides which is which.
//!
//! The decision is assembled from four small, pure pieces:
//! - [`degeneracy`]: does a side node sequence repeat a node?
//! - [`pairing`]: shell/non-shell trichotomy of the two element topologies.
//! - [`polarity`]: do the two attachments traverse the side the same way?
//! - [`shell`]: stacked, opposed, or paved arrangement of two shells.
//!
//! [`coincidence`] combines them into the three classifier entry points,
//! and [`ResolvedSide`] is the element-side descriptor the token-based
//! (cross-rank) entry point works on.
//!
//! Everything here is a pure function of its inputs; results do not depend
//! on evaluation order, so candidate pairs can be classified from any number
//! of threads at once.

pub mod coincidence;
pub mod degeneracy;
pub mod pairing;
pub mod polarity;
pub mod shell;

pub use coincidence::{
    SideCandidate, classify_candidates, is_coincident_connection, is_coincident_connection_precise,
    is_coincident_connection_resolved,
};
#[cfg(feature = "rayon")]
pub use coincidence::par_classify_candidates;
pub use degeneracy::is_degenerate_side;
pub use pairing::{TopologyPairing, pair_topologies};
pub use polarity::{
    is_positive_side_match, resolve_side_attachment, resolved_polarity_matches, side_equivalence,
};
pub use shell::{ShellConnection, shell_connection, shell_connection_resolved};

use crate::mesh_error::MeshAdjacencyError;
use crate::topology::cell::{CellTopology, SideOrdinal};
use crate::topology::side::{SidePermutation, SideTopology};

/// One element side with its attachment permutation resolved against a
/// shared reference ordering of the side's nodes.
///
/// This is all the classifier needs to know about a remote element: the
/// node ids themselves stay on the owning rank.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedSide {
    /// Topology of the element the side belongs to.
    pub topology: CellTopology,
    /// Side ordinal within that element.
    pub side: SideOrdinal,
    /// How the element's side node sequence relates to the reference
    /// ordering.
    pub permutation: SidePermutation,
}

impl ResolvedSide {
    /// Builds a descriptor from already-validated parts.
    ///
    /// # Panics
    /// Debug-panics when `side` or `permutation` is out of range for
    /// `topology`; use [`try_new`](Self::try_new) for untrusted input.
    pub fn new(topology: CellTopology, side: SideOrdinal, permutation: SidePermutation) -> Self {
        debug_assert!(
            (side as usize) < topology.num_sides(),
            "side ordinal {side} out of range for {topology:?}"
        );
        debug_assert!(
            permutation.index() < topology.side_topology(side).num_permutations(),
            "permutation token {} out of range for {topology:?} side {side}",
            permutation.index()
        );
        Self {
            topology,
            side,
            permutation,
        }
    }

    /// Validating constructor for wire-decoded input.
    pub fn try_new(
        topology: CellTopology,
        side: SideOrdinal,
        permutation: SidePermutation,
    ) -> Result<Self, MeshAdjacencyError> {
        let num_sides = topology.num_sides() as u32;
        if side >= num_sides {
            return Err(MeshAdjacencyError::SideOutOfRange {
                topology,
                side,
                num_sides,
            });
        }
        let side_topology = topology.side_topology(side);
        if permutation.index() >= side_topology.num_permutations() {
            return Err(MeshAdjacencyError::InvalidPermutationToken {
                side_topology,
                token: permutation.index(),
                num_permutations: side_topology.num_permutations(),
            });
        }
        Ok(Self {
            topology,
            side,
            permutation,
        })
    }

    /// Shape of the described side.
    #[inline]
    pub fn side_topology(self) -> SideTopology {
        self.topology.side_topology(self.side)
    }

    /// True when the element traverses the side in the reference direction.
    #[inline]
    pub fn is_positive_polarity(self) -> bool {
        self.side_topology().is_positive_polarity(self.permutation)
    }
}
