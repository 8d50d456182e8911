//! Top-level module for mesh topology abstractions.
//!
//! This module provides the reference descriptions of cell shapes and the
//! identities used throughout the crate. It includes:
//! - Strongly-typed node and element identifiers
//! - The cell topology catalog with per-side node orderings
//! - Side shapes and their dihedral permutation groups
//!
//! Most users will interact with `CellTopology` for enumerating sides and
//! `SideTopology` for comparing node orderings on a shared side.

pub mod cell;
pub mod id;
pub mod side;

pub use cell::{CellTopology, SideOrdinal};
pub use id::{ElementId, NodeId};
pub use side::{SideEquivalence, SidePermutation, SideTopology};
