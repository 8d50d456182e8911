//! Arrangement of two shells that share a side.
//!
//! Shells are thin elements whose two faces carry the same nodes, so a pair
//! of shells can share a side in several geometrically distinct ways. Only
//! one of them, [`ShellConnection::Stacked`], makes the pair coincident;
//! shells paved edge-to-edge into a surface are ordinary neighbors.

use crate::connection::ResolvedSide;
use crate::connection::polarity::resolved_polarity_matches;
use crate::topology::cell::{CellTopology, SideOrdinal};

/// How two shells sharing a side are arranged.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShellConnection {
    /// Same surface, thickness directions aligned. The coincident case.
    Stacked,
    /// Same surface, thickness directions opposed (back-to-back).
    Opposed,
    /// Joined through lateral edges in a surface tiling.
    Paved,
    /// A face side met an edge side, or face shapes differ; the pair does
    /// not share a surface at all.
    Mismatched,
}

/// Classifies the arrangement of two shell sides.
///
/// `same_polarity` is whether the two elements traverse the shared side in
/// the same direction. Two face sides lie on the same surface with aligned
/// thickness vectors exactly when they use the same face ordinal and the
/// same winding, or opposite ordinals and opposite windings.
///
/// Symmetric in its `(topology, side)` arguments.
///
/// # Panics
/// Debug-panics when either topology is not a shell.
pub fn shell_connection(
    topo_a: CellTopology,
    side_a: SideOrdinal,
    topo_b: CellTopology,
    side_b: SideOrdinal,
    same_polarity: bool,
) -> ShellConnection {
    debug_assert!(
        topo_a.is_shell() && topo_b.is_shell(),
        "shell arrangement requires two shells, got {topo_a:?} and {topo_b:?}"
    );
    match (
        topo_a.is_shell_face_side(side_a),
        topo_b.is_shell_face_side(side_b),
    ) {
        (true, true) => {
            if topo_a.side_topology(side_a) != topo_b.side_topology(side_b) {
                ShellConnection::Mismatched
            } else if (side_a == side_b) == same_polarity {
                ShellConnection::Stacked
            } else {
                ShellConnection::Opposed
            }
        }
        (false, false) => ShellConnection::Paved,
        _ => ShellConnection::Mismatched,
    }
}

/// Token-form wrapper around [`shell_connection`].
#[inline]
pub fn shell_connection_resolved(a: ResolvedSide, b: ResolvedSide) -> ShellConnection {
    shell_connection(
        a.topology,
        a.side,
        b.topology,
        b.side,
        resolved_polarity_matches(a, b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELLS: [CellTopology; 3] = [
        CellTopology::ShellLine2,
        CellTopology::ShellTriangle3,
        CellTopology::ShellQuadrilateral4,
    ];

    #[test]
    fn face_pairs_split_by_ordinal_and_polarity() {
        for shell in SHELLS {
            // Same ordinal: stacked iff windings agree.
            assert_eq!(
                shell_connection(shell, 0, shell, 0, true),
                ShellConnection::Stacked
            );
            assert_eq!(
                shell_connection(shell, 0, shell, 0, false),
                ShellConnection::Opposed
            );
            // Opposite ordinals: the back face already reverses the winding,
            // so stacking shows up as opposite polarity.
            assert_eq!(
                shell_connection(shell, 0, shell, 1, false),
                ShellConnection::Stacked
            );
            assert_eq!(
                shell_connection(shell, 0, shell, 1, true),
                ShellConnection::Opposed
            );
        }
    }

    #[test]
    fn lateral_edges_pave() {
        assert_eq!(
            shell_connection(
                CellTopology::ShellTriangle3,
                2,
                CellTopology::ShellTriangle3,
                4,
                false
            ),
            ShellConnection::Paved
        );
        assert_eq!(
            shell_connection(
                CellTopology::ShellQuadrilateral4,
                3,
                CellTopology::ShellTriangle3,
                2,
                true
            ),
            ShellConnection::Paved
        );
    }

    #[test]
    fn face_against_edge_is_mismatched() {
        assert_eq!(
            shell_connection(
                CellTopology::ShellTriangle3,
                0,
                CellTopology::ShellTriangle3,
                3,
                true
            ),
            ShellConnection::Mismatched
        );
    }

    #[test]
    fn unequal_face_shapes_are_mismatched() {
        assert_eq!(
            shell_connection(
                CellTopology::ShellTriangle3,
                0,
                CellTopology::ShellQuadrilateral4,
                0,
                true
            ),
            ShellConnection::Mismatched
        );
    }

    #[test]
    fn arrangement_is_symmetric() {
        for a in SHELLS {
            for b in SHELLS {
                for sa in 0..a.num_sides() as SideOrdinal {
                    for sb in 0..b.num_sides() as SideOrdinal {
                        for polarity in [false, true] {
                            assert_eq!(
                                shell_connection(a, sa, b, sb, polarity),
                                shell_connection(b, sb, a, sa, polarity),
                                "{a:?}/{sa} vs {b:?}/{sb} polarity {polarity}"
                            );
                        }
                    }
                }
            }
        }
    }
}
