//! Strong, zero-cost handles for mesh entities.
//!
//! Element-graph code juggles two id spaces at once: the nodes that spell out
//! side connectivity, and the elements being classified. `NodeId` and
//! `ElementId` wrap nonzero `u64`s so the two cannot be mixed up and so 0 is
//! reserved at compile- and runtime as an invalid or sentinel value.
//!
//! This module provides:
//! - Transparent newtypes around `NonZeroU64` for zero-cost FFI and memory
//!   layout guarantees.
//! - Panicking and fallible constructors (`new` / `try_new`); wire-decoding
//!   paths use the fallible form.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing, serde) so both ids can be used in maps, sets, and printed
//!   easily.

use crate::mesh_error::MeshAdjacencyError;
use std::{fmt, num::NonZeroU64};

/// Identifier of a mesh node (vertex).
///
/// # Memory layout
/// `repr(transparent)` over `NonZeroU64`: same ABI and alignment as a `u64`,
/// and `Option<NodeId>` is still 8 bytes.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(NonZeroU64);

/// Identifier of a mesh element (cell or shell).
///
/// Same layout guarantees as [`NodeId`]; the two are distinct types on
/// purpose so a node can never be passed where an element is expected.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ElementId(NonZeroU64);

impl NodeId {
    /// Creates a new `NodeId` from a raw `u64` value.
    ///
    /// # Panics
    ///
    /// Panics if `raw == 0`. We reserve 0 as an invalid or sentinel value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        NodeId(NonZeroU64::new(raw).expect("NodeId must be non-zero"))
    }

    /// Fallible constructor for untrusted input (wire decoding, file import).
    #[inline]
    pub fn try_new(raw: u64) -> Result<Self, MeshAdjacencyError> {
        NonZeroU64::new(raw)
            .map(NodeId)
            .ok_or(MeshAdjacencyError::InvalidNodeId)
    }

    /// Returns the inner `u64` value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl ElementId {
    /// Creates a new `ElementId` from a raw `u64` value.
    ///
    /// # Panics
    ///
    /// Panics if `raw == 0`. We reserve 0 as an invalid or sentinel value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        ElementId(NonZeroU64::new(raw).expect("ElementId must be non-zero"))
    }

    /// Fallible constructor for untrusted input (wire decoding).
    #[inline]
    pub fn try_new(raw: u64) -> Result<Self, MeshAdjacencyError> {
        NonZeroU64::new(raw)
            .map(ElementId)
            .ok_or(MeshAdjacencyError::InvalidElementId)
    }

    /// Returns the inner `u64` value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.get()).finish()
    }
}

/// Prints the numeric id without any wrapper text.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementId").field(&self.get()).finish()
    }
}

/// Prints the numeric id without any wrapper text.
impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// -----------------------------------------------------------------------------
// FFI and layout guarantees
// -----------------------------------------------------------------------------

/// Both ids travel over MPI as plain `u64`s.
#[cfg(feature = "mpi-support")]
unsafe impl mpi::datatype::Equivalence for NodeId {
    type Out = <u64 as mpi::datatype::Equivalence>::Out;

    fn equivalent_datatype() -> Self::Out {
        u64::equivalent_datatype()
    }
}

#[cfg(feature = "mpi-support")]
unsafe impl mpi::datatype::Equivalence for ElementId {
    type Out = <u64 as mpi::datatype::Equivalence>::Out;

    fn equivalent_datatype() -> Self::Out {
        u64::equivalent_datatype()
    }
}



#[cfg(test)]
mod serde_tests {
    use super::*;
    #[test]
    fn json_roundtrip() {
        let n = NodeId::new(123);
        let s = serde_json::to_string(&n).unwrap();
        let n2: NodeId = serde_json::from_str(&s).unwrap();
        assert_eq!(n2, n);
    }
    #[test]
    fn bincode_roundtrip() {
        let e = ElementId::new(456);
        let bytes = bincode::serialize(&e).unwrap();
        let e2: ElementId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(e2, e);
    }
}
