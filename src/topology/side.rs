//! Side shapes and their permutation groups.
//!
//! A side of an element is a line, a triangle, or a quad. Two elements that
//! attach to the same side each see its nodes in some order, and the order
//! relates to the side's canonical one by an element of the side's dihedral
//! group: a rotation keeps the traversal direction, a reflection reverses
//! it. [`SidePermutation`] is the token naming one such group element;
//! tokens below [`SideTopology::num_positive_permutations`] are the
//! rotations.
//!
//! Polarity comparisons reduce to this token: two attachments traverse the
//! side the same way exactly when their tokens are both rotations or both
//! reflections.

use crate::topology::id::NodeId;

/// Shape of an element side.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SideTopology {
    /// 2-node line segment (side of 2D cells and shell laterals).
    Line2,
    /// 3-node triangle.
    Triangle3,
    /// 4-node quadrilateral.
    Quadrilateral4,
}

/// Token for one node arrangement of a side: an index into the side's
/// permutation table. Rotations (positive polarity) come first, then
/// reflections.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct SidePermutation(u8);

impl SidePermutation {
    /// The identity arrangement (canonical order).
    pub const IDENTITY: SidePermutation = SidePermutation(0);

    /// Wraps a raw table index. The index is interpreted relative to a
    /// [`SideTopology`] and must be below its `num_permutations()`; range
    /// checks happen at the point of use.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        SidePermutation(index)
    }

    /// Raw table index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Outcome of comparing a candidate node sequence against a side.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SideEquivalence {
    /// The sequences do not describe the same side.
    NotEquivalent,
    /// Same side; `positive` records whether the traversal directions agree.
    Equivalent {
        /// True when the candidate is a rotation of the reference.
        positive: bool,
    },
}

impl SideEquivalence {
    /// True for either `Equivalent` case.
    #[inline]
    pub fn is_equivalent(self) -> bool {
        matches!(self, SideEquivalence::Equivalent { .. })
    }

    /// True only for `Equivalent { positive: true }`.
    #[inline]
    pub fn is_positive(self) -> bool {
        matches!(self, SideEquivalence::Equivalent { positive: true })
    }
}

// Dihedral permutation tables. Row p maps canonical position i to position
// ords[p][i]; rotations first, reflections second. The groups are closed
// under composition, which is what makes polarity a consistent notion no
// matter which arrangement of the side is taken as reference.
const LINE2_PERMUTATIONS: [[u8; 2]; 2] = [[0, 1], [1, 0]];
const TRIANGLE3_PERMUTATIONS: [[u8; 3]; 6] = [
    [0, 1, 2],
    [2, 0, 1],
    [1, 2, 0],
    [0, 2, 1],
    [2, 1, 0],
    [1, 0, 2],
];
const QUADRILATERAL4_PERMUTATIONS: [[u8; 4]; 8] = [
    [0, 1, 2, 3],
    [3, 0, 1, 2],
    [2, 3, 0, 1],
    [1, 2, 3, 0],
    [0, 3, 2, 1],
    [3, 2, 1, 0],
    [2, 1, 0, 3],
    [1, 0, 3, 2],
];

impl SideTopology {
    /// Number of nodes on the side.
    pub const fn node_count(self) -> usize {
        match self {
            SideTopology::Line2 => 2,
            SideTopology::Triangle3 => 3,
            SideTopology::Quadrilateral4 => 4,
        }
    }

    /// Size of the side's dihedral group.
    pub const fn num_permutations(self) -> u8 {
        match self {
            SideTopology::Line2 => 2,
            SideTopology::Triangle3 => 6,
            SideTopology::Quadrilateral4 => 8,
        }
    }

    /// How many permutations preserve traversal direction (the rotations).
    pub const fn num_positive_permutations(self) -> u8 {
        match self {
            SideTopology::Line2 => 1,
            SideTopology::Triangle3 => 3,
            SideTopology::Quadrilateral4 => 4,
        }
    }

    /// Node ordinals of arrangement `perm`, relative to canonical order.
    ///
    /// # Panics
    /// Panics if `perm.index() >= num_permutations()`.
    pub fn permutation_node_ordinals(self, perm: SidePermutation) -> &'static [u8] {
        let idx = perm.index() as usize;
        debug_assert!(
            idx < self.num_permutations() as usize,
            "permutation token {idx} out of range for {self:?}"
        );
        match self {
            SideTopology::Line2 => &LINE2_PERMUTATIONS[idx],
            SideTopology::Triangle3 => &TRIANGLE3_PERMUTATIONS[idx],
            SideTopology::Quadrilateral4 => &QUADRILATERAL4_PERMUTATIONS[idx],
        }
    }

    /// True when `perm` keeps the canonical traversal direction.
    #[inline]
    pub fn is_positive_polarity(self, perm: SidePermutation) -> bool {
        debug_assert!(
            perm.index() < self.num_permutations(),
            "permutation token {} out of range for {self:?}",
            perm.index()
        );
        perm.index() < self.num_positive_permutations()
    }

    /// Finds the permutation carrying `reference` onto `candidate`, i.e. the
    /// `p` with `candidate[i] == reference[ords(p)[i]]` for all `i`.
    ///
    /// Returns `None` when the sequences are not dihedral rearrangements of
    /// one another (different node sets, or a twisted arrangement outside
    /// the group).
    pub fn permutation_of(
        self,
        reference: &[NodeId],
        candidate: &[NodeId],
    ) -> Option<SidePermutation> {
        debug_assert_eq!(reference.len(), self.node_count(), "{self:?}");
        debug_assert_eq!(candidate.len(), self.node_count(), "{self:?}");
        (0..self.num_permutations())
            .map(SidePermutation::from_index)
            .find(|&p| {
                let ords = self.permutation_node_ordinals(p);
                candidate.len() == ords.len()
                    && candidate
                        .iter()
                        .zip(ords)
                        .all(|(&c, &o)| c == reference[o as usize])
            })
    }

    /// Compares `candidate` against `reference` and folds the result into a
    /// [`SideEquivalence`].
    pub fn equivalence(self, reference: &[NodeId], candidate: &[NodeId]) -> SideEquivalence {
        match self.permutation_of(reference, candidate) {
            Some(p) => SideEquivalence::Equivalent {
                positive: self.is_positive_polarity(p),
            },
            None => SideEquivalence::NotEquivalent,
        }
    }
}
