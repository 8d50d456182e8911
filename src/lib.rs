#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-adjacency
//!
//! mesh-adjacency is a Rust library for deciding how finite-element mesh
//! entities that share a side relate to each other: as true face-to-face
//! neighbors, or as coincident (stacked) copies occupying the same
//! geometric position. It provides the cell-topology catalog, side
//! permutation groups, and polarity rules needed to make that call from
//! connectivity alone, plus a pluggable exchange layer so the same
//! verdicts can be reached for element pairs split across ranks.
//!
//! ## Features
//! - Cell topology catalog (volume and shell shapes) with per-side node
//!   orderings and side shapes
//! - Degeneracy detection for collapsed-node sides
//! - Polarity evaluation from raw node sequences or compact permutation
//!   tokens, with identical results either way
//! - Shell stacking analysis (stacked, opposed, paved, mismatched)
//! - Coarse, precise, and token-based coincidence classifiers
//! - Pluggable communication backends (serial, thread-mailbox, MPI) for
//!   reconciling verdicts on cross-rank pairs
//!
//! ## Determinism
//!
//! Classification is a pure function of the two side attachments, so both
//! owners of a cross-rank pair reach the same verdict independently.
//! [`exchange::reconcile_coincidence`] additionally sorts its output, so
//! verdict order does not depend on message arrival order.
//!
//! ## Usage
//! Add `mesh-adjacency` as a dependency in your `Cargo.toml` and enable
//! features as needed:
//!
//! ```toml
//! [dependencies]
//! mesh-adjacency = "0.4.1"
//! # Optional features:
//! # features = ["mpi-support","rayon"]
//! ```

// Re-export our major subsystems:
pub mod connection;
pub mod exchange;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use mesh_error::MeshAdjacencyError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::connection::{
        ResolvedSide, ShellConnection, SideCandidate, TopologyPairing, classify_candidates,
        is_coincident_connection, is_coincident_connection_precise,
        is_coincident_connection_resolved, is_degenerate_side, pair_topologies,
        resolve_side_attachment, shell_connection, side_equivalence,
    };
    #[cfg(feature = "rayon")]
    pub use crate::connection::par_classify_candidates;
    pub use crate::exchange::communicator::{CommTag, Communicator, NoComm, RayonComm};
    #[cfg(feature = "mpi-support")]
    pub use crate::exchange::communicator::MpiComm;
    pub use crate::exchange::reconcile::{
        CoincidenceVerdict, ReconcileCommTags, RemoteCandidate, reconcile_coincidence,
    };
    pub use crate::mesh::{ElementConnectivity, InMemoryMesh, MeshConnectivity};
    pub use crate::mesh_error::MeshAdjacencyError;
    pub use crate::topology::cell::{CellTopology, SideOrdinal};
    pub use crate::topology::id::{ElementId, NodeId};
    pub use crate::topology::side::{SideEquivalence, SidePermutation, SideTopology};
}
