//! Map-backed implementation of [`MeshConnectivity`].

use crate::mesh::MeshConnectivity;
use crate::topology::cell::CellTopology;
use crate::topology::id::{ElementId, NodeId};
use std::collections::HashMap;

/// Topology plus connectivity of one element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElementConnectivity {
    /// The element's topology.
    pub topology: CellTopology,
    /// Node list in canonical order; length equals `topology.num_nodes()`.
    pub nodes: Vec<NodeId>,
}

/// A simple owned element table.
///
/// # Example
/// ```rust
/// use mesh_adjacency::mesh::{InMemoryMesh, MeshConnectivity};
/// use mesh_adjacency::topology::cell::CellTopology;
/// use mesh_adjacency::topology::id::{ElementId, NodeId};
///
/// let mut mesh = InMemoryMesh::new();
/// mesh.insert_element(
///     ElementId::new(1),
///     CellTopology::Tetrahedron4,
///     (1..=4).map(NodeId::new).collect(),
/// );
/// assert_eq!(mesh.element_topology(ElementId::new(1)), CellTopology::Tetrahedron4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryMesh {
    /// Element table; exposed for iteration and inspection.
    pub elements: HashMap<ElementId, ElementConnectivity>,
}

impl InMemoryMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) one element.
    ///
    /// # Panics
    /// Panics when `nodes` does not hold exactly `topology.num_nodes()`
    /// entries; a malformed table would poison every later query.
    pub fn insert_element(&mut self, elem: ElementId, topology: CellTopology, nodes: Vec<NodeId>) {
        assert_eq!(
            nodes.len(),
            topology.num_nodes(),
            "element {elem} needs {} nodes for {topology:?}, got {}",
            topology.num_nodes(),
            nodes.len()
        );
        self.elements
            .insert(elem, ElementConnectivity { topology, nodes });
    }

    /// Builds a mesh from `(element, topology, nodes)` triples.
    pub fn from_elements<I>(elems: I) -> Self
    where
        I: IntoIterator<Item = (ElementId, CellTopology, Vec<NodeId>)>,
    {
        let mut mesh = Self::new();
        for (elem, topology, nodes) in elems {
            mesh.insert_element(elem, topology, nodes);
        }
        mesh
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when no elements have been inserted.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True when `elem` is present.
    pub fn contains(&self, elem: ElementId) -> bool {
        self.elements.contains_key(&elem)
    }
}

impl MeshConnectivity for InMemoryMesh {
    fn element_topology(&self, elem: ElementId) -> CellTopology {
        self.elements
            .get(&elem)
            .unwrap_or_else(|| panic!("element {elem} not in mesh"))
            .topology
    }

    fn element_nodes(&self, elem: ElementId) -> &[NodeId] {
        &self
            .elements
            .get(&elem)
            .unwrap_or_else(|| panic!("element {elem} not in mesh"))
            .nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u64) -> NodeId {
        NodeId::new(i)
    }

    fn e(i: u64) -> ElementId {
        ElementId::new(i)
    }

    #[test]
    fn insert_and_query() {
        let mut mesh = InMemoryMesh::new();
        assert!(mesh.is_empty());
        mesh.insert_element(e(1), CellTopology::Wedge6, (1..=6).map(n).collect());
        assert_eq!(mesh.len(), 1);
        assert!(mesh.contains(e(1)));
        assert!(!mesh.contains(e(2)));
        assert_eq!(mesh.element_topology(e(1)), CellTopology::Wedge6);
        assert_eq!(mesh.element_nodes(e(1)).len(), 6);
        // Quad side 0 of the wedge is (1, 2, 5, 4).
        assert_eq!(mesh.side_nodes(e(1), 0), vec![n(1), n(2), n(5), n(4)]);
        // Triangular cap, side 3, is (1, 3, 2).
        assert_eq!(mesh.side_nodes(e(1), 3), vec![n(1), n(3), n(2)]);
    }

    #[test]
    fn from_elements_builder() {
        let mesh = InMemoryMesh::from_elements([
            (e(1), CellTopology::Triangle3, vec![n(1), n(2), n(3)]),
            (e(2), CellTopology::Triangle3, vec![n(2), n(1), n(4)]),
        ]);
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.side_nodes(e(2), 0), vec![n(2), n(1)]);
    }

    #[test]
    fn wrong_node_count_panics() {
        let mut mesh = InMemoryMesh::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            mesh.insert_element(e(1), CellTopology::Hexahedron8, vec![n(1), n(2)]);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_element_panics() {
        let mesh = InMemoryMesh::new();
        let result = std::panic::catch_unwind(|| mesh.element_topology(e(9)));
        assert!(result.is_err());
    }
}
