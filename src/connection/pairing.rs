//! Shell/non-shell trichotomy of an element pair.

use crate::topology::cell::CellTopology;

/// The three ways two element topologies can combine, as far as coincidence
/// is concerned.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TopologyPairing {
    /// Both elements are shells; stacked-shell rules apply.
    BothShell,
    /// Neither element is a shell; plain polarity rules apply.
    NeitherShell,
    /// One shell, one non-shell. Never coincident: a shell lying on a solid
    /// face is legitimate adjacency.
    Mixed,
}

/// Classifies the pair `(a, b)`. Symmetric in its arguments.
#[inline]
pub fn pair_topologies(a: CellTopology, b: CellTopology) -> TopologyPairing {
    match (a.is_shell(), b.is_shell()) {
        (true, true) => TopologyPairing::BothShell,
        (false, false) => TopologyPairing::NeitherShell,
        _ => TopologyPairing::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trichotomy_matches_is_shell() {
        for a in CellTopology::ALL {
            for b in CellTopology::ALL {
                let expected = match (a.is_shell(), b.is_shell()) {
                    (true, true) => TopologyPairing::BothShell,
                    (false, false) => TopologyPairing::NeitherShell,
                    _ => TopologyPairing::Mixed,
                };
                assert_eq!(pair_topologies(a, b), expected, "{a:?} vs {b:?}");
                assert_eq!(pair_topologies(a, b), pair_topologies(b, a));
            }
        }
    }

    #[test]
    fn sample_pairings() {
        assert_eq!(
            pair_topologies(CellTopology::Hexahedron8, CellTopology::Tetrahedron4),
            TopologyPairing::NeitherShell
        );
        assert_eq!(
            pair_topologies(
                CellTopology::ShellQuadrilateral4,
                CellTopology::ShellTriangle3
            ),
            TopologyPairing::BothShell
        );
        assert_eq!(
            pair_topologies(CellTopology::Hexahedron8, CellTopology::ShellQuadrilateral4),
            TopologyPairing::Mixed
        );
    }
}
