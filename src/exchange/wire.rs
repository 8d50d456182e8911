//! Fixed, little-endian wire records for the reconciliation exchange.
//!
//! All multi-byte integers in these structs are **little-endian** on the
//! wire. We store them pre-LE with `.to_le()` and decode with `from_le`,
//! so a record can travel between ranks of different endianness and the
//! permutation token round-trips bit-exactly.

use bytemuck::{Pod, Zeroable};
use std::mem::{align_of, size_of};

use crate::connection::ResolvedSide;
use crate::mesh_error::MeshAdjacencyError;
use crate::topology::cell::{CellTopology, SideOrdinal};
use crate::topology::id::ElementId;
use crate::topology::side::SidePermutation;

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

pub fn cast_slice_mut<T: Pod>(v: &mut [T]) -> &mut [u8] {
    bytemuck::cast_slice_mut(v)
}

pub fn cast_slice_from<T: Pod>(v: &[u8]) -> &[T] {
    bytemuck::cast_slice(v)
}

/// Count header preceding a batch of records.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireCount {
    pub n_le: u32,
}

impl WireCount {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u32).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u32::from_le(self.n_le) as usize
    }
}

/// One candidate half on the wire.
///
/// `element`/`side` describe the sender's half; `peer_element`/`peer_side`
/// name the receiver's half the record refers to. Both sides are carried
/// because an element pair can share more than one side (stacked shells
/// share both faces), so element ids alone do not identify the pair.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireSideCandidate {
    /// Sender's element id.
    pub element_le: u64,
    /// Receiver's element id.
    pub peer_element_le: u64,
    /// Sender's side ordinal.
    pub side_le: u32,
    /// Receiver's side ordinal.
    pub peer_side_le: u32,
    /// Topology wire id of the sender's element.
    pub topology_le: u16,
    /// Permutation token; single byte, endianness-free.
    pub permutation: u8,
    pub _pad: [u8; 5],
}

impl WireSideCandidate {
    pub const SIZE: usize = 32; // 8 + 8 + 4 + 4 + 2 + 1 + 5

    pub fn new(
        element: ElementId,
        peer_element: ElementId,
        peer_side: SideOrdinal,
        side: ResolvedSide,
    ) -> Self {
        Self {
            element_le: element.get().to_le(),
            peer_element_le: peer_element.get().to_le(),
            side_le: side.side.to_le(),
            peer_side_le: peer_side.to_le(),
            topology_le: side.topology.wire_id().to_le(),
            permutation: side.permutation.index(),
            _pad: [0; 5],
        }
    }

    /// Validating decode; every field of a received record is untrusted.
    pub fn decode(&self) -> Result<DecodedCandidate, MeshAdjacencyError> {
        let element = ElementId::try_new(u64::from_le(self.element_le))?;
        let peer_element = ElementId::try_new(u64::from_le(self.peer_element_le))?;
        let raw_topology = u16::from_le(self.topology_le);
        let topology = CellTopology::from_wire_id(raw_topology)
            .ok_or(MeshAdjacencyError::UnknownTopologyId(raw_topology))?;
        let side = ResolvedSide::try_new(
            topology,
            u32::from_le(self.side_le),
            SidePermutation::from_index(self.permutation),
        )?;
        Ok(DecodedCandidate {
            element,
            peer_element,
            peer_side: u32::from_le(self.peer_side_le),
            side,
        })
    }
}

/// A validated, host-order view of one received record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodedCandidate {
    pub element: ElementId,
    pub peer_element: ElementId,
    pub peer_side: SideOrdinal,
    pub side: ResolvedSide,
}

// ===== Compile-time sanity checks =========================================

const _: () = {
    // Pod/Zeroable ensures no padding contains uninit when cast to bytes.
    assert!(size_of::<WireCount>() == 4);
    assert!(size_of::<WireSideCandidate>() == WireSideCandidate::SIZE);
    assert!(align_of::<WireSideCandidate>() == 8);
};
