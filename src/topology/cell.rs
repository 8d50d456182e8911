//! Element topologies and their side tables.
//!
//! [`CellTopology`] is a closed enum over the element shapes the
//! classification core understands: 2D cells, 3D solids, and shells. Every
//! query is an exhaustive match over static tables, so adding a shape is a
//! compile-time checklist rather than a runtime registry.
//!
//! Side numbering follows the usual exodus-style conventions. For shells,
//! sides 0 and 1 are the two faces (side 1 winds opposite to side 0) and any
//! remaining sides are the lateral edges, which is what lets paved shell
//! arrangements be told apart from stacked ones.

use crate::topology::id::NodeId;
use crate::topology::side::SideTopology;

/// Ordinal of a side within its element, in `[0, num_sides())`.
pub type SideOrdinal = u32;

/// Closed set of element topologies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellTopology {
    /// 2D simplex (3 nodes, 3 edge sides).
    Triangle3,
    /// 2D tensor-product cell (4 nodes, 4 edge sides).
    Quadrilateral4,
    /// 3D simplex (4 nodes, 4 triangular sides).
    Tetrahedron4,
    /// 3D pyramid (5 nodes, 4 triangular sides + 1 quad base).
    Pyramid5,
    /// 3D wedge/prism (6 nodes, 3 quad sides + 2 triangular caps).
    Wedge6,
    /// 3D tensor-product cell (8 nodes, 6 quad sides).
    Hexahedron8,
    /// 1D shell embedded in 2D (2 nodes, 2 opposing line faces).
    ShellLine2,
    /// Triangular shell (3 nodes, 2 opposing faces + 3 lateral edges).
    ShellTriangle3,
    /// Quadrilateral shell (4 nodes, 2 opposing faces + 4 lateral edges).
    ShellQuadrilateral4,
}

// Per-topology side tables: node ordinals of each side, face sides first for
// shells. Side 1 of every shell traverses the same nodes as side 0 with the
// opposite winding.
const TRIANGLE3_SIDES: &[&[u8]] = &[&[0, 1], &[1, 2], &[2, 0]];
const QUADRILATERAL4_SIDES: &[&[u8]] = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const TETRAHEDRON4_SIDES: &[&[u8]] = &[&[0, 1, 3], &[1, 2, 3], &[0, 3, 2], &[0, 2, 1]];
const PYRAMID5_SIDES: &[&[u8]] = &[
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[0, 4, 3],
    &[0, 3, 2, 1],
];
const WEDGE6_SIDES: &[&[u8]] = &[
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[0, 3, 5, 2],
    &[0, 2, 1],
    &[3, 4, 5],
];
const HEXAHEDRON8_SIDES: &[&[u8]] = &[
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[0, 4, 7, 3],
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
];
const SHELL_LINE2_SIDES: &[&[u8]] = &[&[0, 1], &[1, 0]];
const SHELL_TRIANGLE3_SIDES: &[&[u8]] = &[
    &[0, 1, 2],
    &[0, 2, 1],
    &[0, 1],
    &[1, 2],
    &[2, 0],
];
const SHELL_QUADRILATERAL4_SIDES: &[&[u8]] = &[
    &[0, 1, 2, 3],
    &[0, 3, 2, 1],
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[3, 0],
];

impl CellTopology {
    /// Every supported topology, in wire-id order.
    pub const ALL: [CellTopology; 9] = [
        CellTopology::Triangle3,
        CellTopology::Quadrilateral4,
        CellTopology::Tetrahedron4,
        CellTopology::Pyramid5,
        CellTopology::Wedge6,
        CellTopology::Hexahedron8,
        CellTopology::ShellLine2,
        CellTopology::ShellTriangle3,
        CellTopology::ShellQuadrilateral4,
    ];

    /// True for shell topologies (thin elements with two opposing faces).
    #[inline]
    pub const fn is_shell(self) -> bool {
        matches!(
            self,
            CellTopology::ShellLine2
                | CellTopology::ShellTriangle3
                | CellTopology::ShellQuadrilateral4
        )
    }

    /// Topological dimension of the space the element lives in.
    pub const fn dimension(self) -> u8 {
        match self {
            CellTopology::Triangle3 | CellTopology::Quadrilateral4 | CellTopology::ShellLine2 => 2,
            CellTopology::Tetrahedron4
            | CellTopology::Pyramid5
            | CellTopology::Wedge6
            | CellTopology::Hexahedron8
            | CellTopology::ShellTriangle3
            | CellTopology::ShellQuadrilateral4 => 3,
        }
    }

    /// Number of nodes in the element's connectivity list.
    pub const fn num_nodes(self) -> usize {
        match self {
            CellTopology::ShellLine2 => 2,
            CellTopology::Triangle3 | CellTopology::ShellTriangle3 => 3,
            CellTopology::Quadrilateral4
            | CellTopology::Tetrahedron4
            | CellTopology::ShellQuadrilateral4 => 4,
            CellTopology::Pyramid5 => 5,
            CellTopology::Wedge6 => 6,
            CellTopology::Hexahedron8 => 8,
        }
    }

    /// Number of sides, counting shell faces and lateral edges.
    #[inline]
    pub fn num_sides(self) -> usize {
        self.side_tables().len()
    }

    fn side_tables(self) -> &'static [&'static [u8]] {
        match self {
            CellTopology::Triangle3 => TRIANGLE3_SIDES,
            CellTopology::Quadrilateral4 => QUADRILATERAL4_SIDES,
            CellTopology::Tetrahedron4 => TETRAHEDRON4_SIDES,
            CellTopology::Pyramid5 => PYRAMID5_SIDES,
            CellTopology::Wedge6 => WEDGE6_SIDES,
            CellTopology::Hexahedron8 => HEXAHEDRON8_SIDES,
            CellTopology::ShellLine2 => SHELL_LINE2_SIDES,
            CellTopology::ShellTriangle3 => SHELL_TRIANGLE3_SIDES,
            CellTopology::ShellQuadrilateral4 => SHELL_QUADRILATERAL4_SIDES,
        }
    }

    /// Node ordinals of `side`, in the side's canonical winding.
    ///
    /// # Panics
    /// Panics if `side >= num_sides()`; side ordinals out of range are a
    /// caller bug, not a recoverable condition.
    #[inline]
    pub fn side_node_ordinals(self, side: SideOrdinal) -> &'static [u8] {
        let tables = self.side_tables();
        debug_assert!(
            (side as usize) < tables.len(),
            "side ordinal {side} out of range for {self:?}"
        );
        tables[side as usize]
    }

    /// Shape of `side` (line, triangle, or quad).
    ///
    /// # Panics
    /// Panics if `side >= num_sides()`.
    pub fn side_topology(self, side: SideOrdinal) -> SideTopology {
        match self.side_node_ordinals(side).len() {
            2 => SideTopology::Line2,
            3 => SideTopology::Triangle3,
            _ => SideTopology::Quadrilateral4,
        }
    }

    /// True when `side` is one of the two faces of a shell.
    ///
    /// Solid and 2D cells have no shell faces; their sides all answer false.
    #[inline]
    pub const fn is_shell_face_side(self, side: SideOrdinal) -> bool {
        self.is_shell() && side < 2
    }

    /// Extracts the nodes of `side` from the element's connectivity list.
    ///
    /// # Panics
    /// Panics if `side` is out of range or `element_nodes` does not hold
    /// exactly [`num_nodes`](Self::num_nodes) entries.
    pub fn side_nodes(self, element_nodes: &[NodeId], side: SideOrdinal) -> Vec<NodeId> {
        debug_assert_eq!(
            element_nodes.len(),
            self.num_nodes(),
            "connectivity length mismatch for {self:?}"
        );
        self.side_node_ordinals(side)
            .iter()
            .map(|&ord| element_nodes[ord as usize])
            .collect()
    }

    /// Stable id used in wire records.
    pub const fn wire_id(self) -> u16 {
        match self {
            CellTopology::Triangle3 => 1,
            CellTopology::Quadrilateral4 => 2,
            CellTopology::Tetrahedron4 => 3,
            CellTopology::Pyramid5 => 4,
            CellTopology::Wedge6 => 5,
            CellTopology::Hexahedron8 => 6,
            CellTopology::ShellLine2 => 7,
            CellTopology::ShellTriangle3 => 8,
            CellTopology::ShellQuadrilateral4 => 9,
        }
    }

    /// Inverse of [`wire_id`](Self::wire_id); `None` for unknown ids.
    pub fn from_wire_id(id: u16) -> Option<CellTopology> {
        match id {
            1 => Some(CellTopology::Triangle3),
            2 => Some(CellTopology::Quadrilateral4),
            3 => Some(CellTopology::Tetrahedron4),
            4 => Some(CellTopology::Pyramid5),
            5 => Some(CellTopology::Wedge6),
            6 => Some(CellTopology::Hexahedron8),
            7 => Some(CellTopology::ShellLine2),
            8 => Some(CellTopology::ShellTriangle3),
            9 => Some(CellTopology::ShellQuadrilateral4),
            _ => None,
        }
    }
}
