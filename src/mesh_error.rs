//! MeshAdjacencyError: Unified error type for mesh-adjacency public APIs
//!
//! Every fallible public operation in this crate reports through this
//! enum, so callers match on one type whether a failure came from local
//! validation or from the cross-rank exchange.

use thiserror::Error;

use crate::topology::cell::CellTopology;
use crate::topology::side::SideTopology;

/// Unified error type for mesh-adjacency operations.
#[derive(Debug, Error)]
pub enum MeshAdjacencyError {
    /// Attempted to construct a NodeId with a zero value (invalid).
    #[error("NodeId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidNodeId,
    /// Attempted to construct an ElementId with a zero value (invalid).
    #[error("ElementId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidElementId,
    /// A side ordinal does not exist on the named topology.
    #[error("side {side} out of range for {topology:?} ({num_sides} sides)")]
    SideOutOfRange {
        topology: CellTopology,
        side: u32,
        num_sides: u32,
    },
    /// A permutation token does not name a symmetry of the side shape.
    #[error(
        "permutation token {token} out of range for {side_topology:?} ({num_permutations} permutations)"
    )]
    InvalidPermutationToken {
        side_topology: SideTopology,
        token: u8,
        num_permutations: u8,
    },
    /// A wire record named a topology id this build does not recognize.
    #[error("unknown topology wire id {0}")]
    UnknownTopologyId(u16),
    /// Communication error with a neighbor rank.
    #[error("communication error with neighbor {neighbor}: {source}")]
    CommError {
        neighbor: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A received record matched no locally enumerated candidate pair.
    #[error(
        "record from neighbor {neighbor} (element {element}, peer element {peer_element}) matches no local candidate"
    )]
    UnmatchedCandidate {
        neighbor: usize,
        element: u64,
        peer_element: u64,
    },
    /// Local candidates went unanswered after the exchange drained.
    #[error("{missing} candidate(s) received no record from neighbor {neighbor}")]
    MissingRemoteRecords { neighbor: usize, missing: usize },
}
