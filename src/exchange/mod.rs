//! Cross-rank exchange of candidate-pair records.
//!
//! Submodules:
//! - [`communicator`]: the transport abstraction (`NoComm`, `RayonComm`,
//!   and an MPI backend behind the `mpi-support` feature).
//! - [`wire`]: fixed little-endian records cast to bytes with `bytemuck`.
//! - [`reconcile`]: the two-stage exchange that classifies cross-rank
//!   candidate pairs and returns rank-symmetric verdicts.

pub mod communicator;
pub mod reconcile;
pub mod wire;

pub use communicator::{CommTag, Communicator, NoComm, RayonComm, Wait};
pub use reconcile::{
    CoincidenceVerdict, ReconcileCommTags, RemoteCandidate, reconcile_coincidence,
};
pub use wire::{WireCount, WireSideCandidate};

#[cfg(feature = "mpi-support")]
pub use communicator::MpiComm;
