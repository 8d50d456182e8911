//! Narrow mesh interface the classifier reads through.
//!
//! The classifier needs exactly two facts about a local element: its
//! topology and its node connectivity. [`MeshConnectivity`] captures that
//! and nothing else, so any mesh store (bucketed, compressed, foreign) can
//! plug in; [`InMemoryMesh`] is the map-backed implementation used
//! throughout the tests and by small tools.

pub mod in_memory;

pub use in_memory::{ElementConnectivity, InMemoryMesh};

use crate::topology::cell::{CellTopology, SideOrdinal};
use crate::topology::id::{ElementId, NodeId};

/// Read access to element topology and connectivity.
///
/// Implementations answer for elements they own; asking about an unknown
/// element is a caller bug and panics.
pub trait MeshConnectivity {
    /// Topology of `elem`.
    ///
    /// # Panics
    /// Panics if `elem` is not part of the mesh.
    fn element_topology(&self, elem: ElementId) -> CellTopology;

    /// Nodes of `elem` in its canonical connectivity order.
    ///
    /// # Panics
    /// Panics if `elem` is not part of the mesh.
    fn element_nodes(&self, elem: ElementId) -> &[NodeId];

    /// Nodes of one side of `elem`, in the side's winding.
    ///
    /// # Panics
    /// Panics if `elem` is unknown or `side` is out of range.
    fn side_nodes(&self, elem: ElementId, side: SideOrdinal) -> Vec<NodeId> {
        let topology = self.element_topology(elem);
        topology.side_nodes(self.element_nodes(elem), side)
    }
}
