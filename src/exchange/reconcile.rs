//! Cross-rank reconciliation of coincidence verdicts.
//!
//! When the two elements of a candidate pair live on different ranks,
//! each rank holds only its own half: the local element, the side it
//! attaches with, and the identity of the remote half. Both ranks send
//! their half (as a [`WireSideCandidate`]) to the peer, pair the received
//! record with the matching local candidate, and classify from the two
//! polarity tokens. Because both ranks evaluate the same pure predicate
//! on the same pair of tokens, the verdicts agree without a second
//! round trip.
//!
//! The exchange runs in two stages on distinct tags: counts first, then
//! the record payloads sized by stage one. All receives are posted before
//! any send, and every handle is drained before returning, error or not.

use hashbrown::HashMap;

use crate::connection::{ResolvedSide, is_coincident_connection_resolved};
use crate::exchange::communicator::{CommTag, Communicator, Wait};
use crate::exchange::wire::{
    WireCount, WireSideCandidate, cast_slice, cast_slice_from, cast_slice_mut,
};
use crate::mesh_error::MeshAdjacencyError;
use crate::topology::cell::SideOrdinal;
use crate::topology::id::ElementId;

/// Message tags for the two stages of one reconciliation round.
///
/// Derive both from a single base so concurrent rounds (or other
/// exchanges on the same communicator) can be kept apart by spacing
/// their bases at least two tags apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReconcileCommTags {
    pub sizes: CommTag,
    pub records: CommTag,
}

impl ReconcileCommTags {
    pub const fn from_base(base: CommTag) -> Self {
        Self {
            sizes: base,
            records: base.offset(1),
        }
    }
}

/// The locally known half of a cross-rank candidate pair.
///
/// Both ranks must enumerate the same pairs (they see the same shared
/// side entity), so for every `RemoteCandidate` here the owner of
/// `remote_element` holds the mirror-image candidate pointing back.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RemoteCandidate {
    /// Element owned by this rank.
    pub local_element: ElementId,
    /// How `local_element` attaches to the shared side.
    pub local_side: ResolvedSide,
    /// Rank owning the other element.
    pub remote_rank: usize,
    /// The other element.
    pub remote_element: ElementId,
    /// Side ordinal of the other element on the shared side.
    pub remote_side: SideOrdinal,
}

/// One classified cross-rank pair.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoincidenceVerdict {
    pub local_element: ElementId,
    pub local_side: SideOrdinal,
    pub remote_rank: usize,
    pub remote_element: ElementId,
    pub remote_side: SideOrdinal,
    /// `true` if the pair is coincident (stacked), `false` for a true
    /// face-to-face neighbor.
    pub coincident: bool,
}

type CandidateKey = (ElementId, SideOrdinal, usize, ElementId, SideOrdinal);

fn candidate_key(cand: &RemoteCandidate) -> CandidateKey {
    (
        cand.local_element,
        cand.local_side.side,
        cand.remote_rank,
        cand.remote_element,
        cand.remote_side,
    )
}

/// Classify every cross-rank candidate pair in `candidates`.
///
/// Returns one verdict per candidate, sorted by
/// `(local_element, local_side, remote_rank, remote_element, remote_side)`
/// so the output order is deterministic regardless of input or arrival
/// order. Errors if a peer sends a malformed record, a record matches no
/// local candidate, or a local candidate goes unanswered; in all cases
/// every outstanding handle is drained before the error is returned.
pub fn reconcile_coincidence<C: Communicator>(
    comm: &C,
    tags: ReconcileCommTags,
    candidates: &[RemoteCandidate],
) -> Result<Vec<CoincidenceVerdict>, MeshAdjacencyError> {
    let mut outgoing: HashMap<usize, Vec<&RemoteCandidate>> = HashMap::new();
    for cand in candidates {
        outgoing.entry(cand.remote_rank).or_default().push(cand);
    }

    let incoming_counts = exchange_counts(comm, tags.sizes, &outgoing)?;
    let received = exchange_records(comm, tags.records, &outgoing, &incoming_counts)?;

    // Pair received records with local candidates. A record names the
    // sender's half (element, side) and our half (peer_element,
    // peer_side); together with the sender's rank that pins down exactly
    // one candidate. Matched candidates are removed so a duplicate
    // record surfaces as unmatched rather than a double verdict.
    let mut index: HashMap<CandidateKey, &RemoteCandidate> =
        HashMap::with_capacity(candidates.len());
    for cand in candidates {
        let prev = index.insert(candidate_key(cand), cand);
        debug_assert!(prev.is_none(), "duplicate reconcile candidate");
    }

    let mut verdicts = Vec::with_capacity(candidates.len());
    let mut maybe_err: Option<MeshAdjacencyError> = None;
    for (nbr, records) in &received {
        for record in records {
            let decoded = match record.decode() {
                Ok(decoded) => decoded,
                Err(err) => {
                    log::warn!("rank {} sent a malformed candidate record: {}", nbr, err);
                    if maybe_err.is_none() {
                        maybe_err = Some(err);
                    }
                    continue;
                }
            };
            let key = (
                decoded.peer_element,
                decoded.peer_side,
                *nbr,
                decoded.element,
                decoded.side.side,
            );
            match index.remove(&key) {
                Some(cand) => {
                    verdicts.push(CoincidenceVerdict {
                        local_element: cand.local_element,
                        local_side: cand.local_side.side,
                        remote_rank: *nbr,
                        remote_element: cand.remote_element,
                        remote_side: cand.remote_side,
                        coincident: is_coincident_connection_resolved(
                            cand.local_side,
                            decoded.side,
                        ),
                    });
                }
                None => {
                    log::warn!(
                        "record from rank {} (element {}, peer element {}) matches no local candidate",
                        nbr,
                        decoded.element,
                        decoded.peer_element
                    );
                    if maybe_err.is_none() {
                        maybe_err = Some(MeshAdjacencyError::UnmatchedCandidate {
                            neighbor: *nbr,
                            element: decoded.element.get(),
                            peer_element: decoded.peer_element.get(),
                        });
                    }
                }
            }
        }
    }

    if let Some(err) = maybe_err {
        return Err(err);
    }
    if !index.is_empty() {
        let neighbor = index
            .values()
            .map(|cand| cand.remote_rank)
            .min()
            .unwrap_or(0);
        log::warn!(
            "{} local candidates received no answering record (first from rank {})",
            index.len(),
            neighbor
        );
        return Err(MeshAdjacencyError::MissingRemoteRecords {
            neighbor,
            missing: index.len(),
        });
    }

    verdicts.sort_unstable_by_key(|v| {
        (
            v.local_element,
            v.local_side,
            v.remote_rank,
            v.remote_element,
            v.remote_side,
        )
    });
    Ok(verdicts)
}

/// Stage 1: tell every neighbor how many records to expect.
fn exchange_counts<C: Communicator>(
    comm: &C,
    tag: CommTag,
    outgoing: &HashMap<usize, Vec<&RemoteCandidate>>,
) -> Result<HashMap<usize, usize>, MeshAdjacencyError> {
    // Post all receives first.
    let mut recv_counts: HashMap<usize, (C::RecvHandle, WireCount)> =
        HashMap::with_capacity(outgoing.len());
    for &nbr in outgoing.keys() {
        let mut count = WireCount::new(0);
        let handle = comm.irecv(
            nbr,
            tag.as_u16(),
            cast_slice_mut(std::slice::from_mut(&mut count)),
        );
        recv_counts.insert(nbr, (handle, count));
    }

    // Then post all sends.
    let mut pending_sends = Vec::with_capacity(outgoing.len());
    for (&nbr, cands) in outgoing.iter() {
        let count = WireCount::new(cands.len());
        pending_sends.push(comm.isend(
            nbr,
            tag.as_u16(),
            cast_slice(std::slice::from_ref(&count)),
        ));
    }

    // Wait for all receives, collecting counts but never returning early:
    // the sends below must be drained even when a receive fails.
    let mut counts_in = HashMap::with_capacity(recv_counts.len());
    let mut maybe_err: Option<MeshAdjacencyError> = None;
    for (nbr, (handle, mut count)) in recv_counts {
        match handle.wait() {
            Some(data) if data.len() == std::mem::size_of::<WireCount>() => {
                if maybe_err.is_none() {
                    cast_slice_mut(std::slice::from_mut(&mut count)).copy_from_slice(&data);
                    counts_in.insert(nbr, count.get());
                }
            }
            Some(data) => {
                if maybe_err.is_none() {
                    maybe_err = Some(MeshAdjacencyError::CommError {
                        neighbor: nbr,
                        source: format!(
                            "count exchange: expected {} bytes, got {}",
                            std::mem::size_of::<WireCount>(),
                            data.len()
                        )
                        .into(),
                    });
                }
            }
            None => {
                if maybe_err.is_none() {
                    maybe_err = Some(MeshAdjacencyError::CommError {
                        neighbor: nbr,
                        source: "count exchange: receive completed without data".into(),
                    });
                }
            }
        }
    }

    for send in pending_sends {
        let _ = send.wait();
    }

    match maybe_err {
        Some(err) => Err(err),
        None => Ok(counts_in),
    }
}

/// Stage 2: exchange the record payloads sized by stage 1.
fn exchange_records<C: Communicator>(
    comm: &C,
    tag: CommTag,
    outgoing: &HashMap<usize, Vec<&RemoteCandidate>>,
    incoming_counts: &HashMap<usize, usize>,
) -> Result<HashMap<usize, Vec<WireSideCandidate>>, MeshAdjacencyError> {
    let mut recv_records: HashMap<usize, (C::RecvHandle, Vec<u8>)> =
        HashMap::with_capacity(incoming_counts.len());
    for (&nbr, &n_records) in incoming_counts {
        let mut buffer = vec![0u8; n_records * WireSideCandidate::SIZE];
        let handle = comm.irecv(nbr, tag.as_u16(), &mut buffer);
        recv_records.insert(nbr, (handle, buffer));
    }

    let mut send_buffers = Vec::with_capacity(outgoing.len());
    let mut pending_sends = Vec::with_capacity(outgoing.len());
    for (&nbr, cands) in outgoing.iter() {
        let records: Vec<WireSideCandidate> = cands
            .iter()
            .map(|cand| {
                WireSideCandidate::new(
                    cand.local_element,
                    cand.remote_element,
                    cand.remote_side,
                    cand.local_side,
                )
            })
            .collect();
        pending_sends.push(comm.isend(nbr, tag.as_u16(), cast_slice(&records)));
        send_buffers.push(records);
    }

    let mut received = HashMap::with_capacity(recv_records.len());
    let mut maybe_err: Option<MeshAdjacencyError> = None;
    for (nbr, (handle, buffer)) in recv_records {
        match handle.wait() {
            Some(data) if data.len() == buffer.len() => {
                if maybe_err.is_none() {
                    let records: &[WireSideCandidate] = cast_slice_from(&data);
                    received.insert(nbr, records.to_vec());
                }
            }
            Some(data) => {
                if maybe_err.is_none() {
                    maybe_err = Some(MeshAdjacencyError::CommError {
                        neighbor: nbr,
                        source: format!(
                            "record exchange: expected {} bytes, got {}",
                            buffer.len(),
                            data.len()
                        )
                        .into(),
                    });
                }
            }
            None => {
                if maybe_err.is_none() {
                    maybe_err = Some(MeshAdjacencyError::CommError {
                        neighbor: nbr,
                        source: "record exchange: receive completed without data".into(),
                    });
                }
            }
        }
    }

    for send in pending_sends {
        let _ = send.wait();
    }
    drop(send_buffers);

    match maybe_err {
        Some(err) => Err(err),
        None => Ok(received),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::communicator::{NoComm, RayonComm};
    use crate::topology::cell::CellTopology;
    use crate::topology::side::SidePermutation;
    use serial_test::serial;

    fn resolved(topology: CellTopology, side: u32, perm: u8) -> ResolvedSide {
        ResolvedSide::new(topology, side, SidePermutation::from_index(perm))
    }

    #[test]
    fn no_candidates_is_trivially_reconciled() {
        let comm = NoComm;
        let tags = ReconcileCommTags::from_base(CommTag::new(0x30));
        let verdicts = reconcile_coincidence(&comm, tags, &[]).unwrap();
        assert!(verdicts.is_empty());
    }

    #[test]
    #[serial]
    fn two_ranks_agree_on_mixed_verdicts() {
        let tags = ReconcileCommTags::from_base(CommTag::new(0x40));

        // Pair 1: hexes facing each other across a shared quad. The far
        // hex sees the face with reversed winding, so the tokens differ
        // in sign and the pair is a true neighbor.
        // Pair 2: two hexes attaching the same side with the same
        // winding, a stacked (coincident) pair.
        let rank0_candidates = vec![
            RemoteCandidate {
                local_element: ElementId::new(1),
                local_side: resolved(CellTopology::Hexahedron8, 5, 0),
                remote_rank: 1,
                remote_element: ElementId::new(2),
                remote_side: 4,
            },
            RemoteCandidate {
                local_element: ElementId::new(11),
                local_side: resolved(CellTopology::Hexahedron8, 0, 0),
                remote_rank: 1,
                remote_element: ElementId::new(12),
                remote_side: 0,
            },
        ];
        let rank1_candidates = vec![
            RemoteCandidate {
                local_element: ElementId::new(2),
                local_side: resolved(CellTopology::Hexahedron8, 4, 4),
                remote_rank: 0,
                remote_element: ElementId::new(1),
                remote_side: 5,
            },
            RemoteCandidate {
                local_element: ElementId::new(12),
                local_side: resolved(CellTopology::Hexahedron8, 0, 0),
                remote_rank: 0,
                remote_element: ElementId::new(11),
                remote_side: 0,
            },
        ];

        let remote = std::thread::spawn(move || {
            let comm = RayonComm::new(1);
            reconcile_coincidence(&comm, tags, &rank1_candidates)
        });
        let comm = RayonComm::new(0);
        let local = reconcile_coincidence(&comm, tags, &rank0_candidates).unwrap();
        let remote = remote.join().unwrap().unwrap();

        assert_eq!(local.len(), 2);
        assert_eq!(remote.len(), 2);

        // Output is sorted by local element, so pair 1 comes first on
        // both ranks.
        assert_eq!(local[0].local_element, ElementId::new(1));
        assert!(!local[0].coincident);
        assert_eq!(local[1].local_element, ElementId::new(11));
        assert!(local[1].coincident);

        assert_eq!(remote[0].local_element, ElementId::new(2));
        assert!(!remote[0].coincident);
        assert_eq!(remote[1].local_element, ElementId::new(12));
        assert!(remote[1].coincident);

        // Both ranks reached the same verdict on each shared pair.
        assert_eq!(local[0].coincident, remote[0].coincident);
        assert_eq!(local[1].coincident, remote[1].coincident);
    }

    #[test]
    #[serial]
    fn verdicts_do_not_depend_on_candidate_order() {
        // Same candidate set in two different orders must give identical
        // verdict vectors. The set includes one element pair sharing two
        // sides (a stacked shell pair shares both faces), so the match
        // key has to separate the two candidates by side ordinal.
        let first_tags = ReconcileCommTags::from_base(CommTag::new(0x70));
        let second_tags = ReconcileCommTags::from_base(CommTag::new(0x72));

        let mut rank0_candidates = vec![
            RemoteCandidate {
                local_element: ElementId::new(1),
                local_side: resolved(CellTopology::Hexahedron8, 5, 0),
                remote_rank: 1,
                remote_element: ElementId::new(2),
                remote_side: 4,
            },
            RemoteCandidate {
                local_element: ElementId::new(21),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 0, 0),
                remote_rank: 1,
                remote_element: ElementId::new(22),
                remote_side: 0,
            },
            RemoteCandidate {
                local_element: ElementId::new(21),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 1, 0),
                remote_rank: 1,
                remote_element: ElementId::new(22),
                remote_side: 1,
            },
            RemoteCandidate {
                local_element: ElementId::new(31),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 0, 0),
                remote_rank: 1,
                remote_element: ElementId::new(32),
                remote_side: 0,
            },
        ];
        let rank1_candidates = vec![
            RemoteCandidate {
                local_element: ElementId::new(2),
                local_side: resolved(CellTopology::Hexahedron8, 4, 4),
                remote_rank: 0,
                remote_element: ElementId::new(1),
                remote_side: 5,
            },
            RemoteCandidate {
                local_element: ElementId::new(22),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 0, 0),
                remote_rank: 0,
                remote_element: ElementId::new(21),
                remote_side: 0,
            },
            RemoteCandidate {
                local_element: ElementId::new(22),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 1, 0),
                remote_rank: 0,
                remote_element: ElementId::new(21),
                remote_side: 1,
            },
            RemoteCandidate {
                local_element: ElementId::new(32),
                local_side: resolved(CellTopology::ShellQuadrilateral4, 0, 4),
                remote_rank: 0,
                remote_element: ElementId::new(31),
                remote_side: 0,
            },
        ];

        let remote = std::thread::spawn(move || {
            let comm = RayonComm::new(1);
            let first = reconcile_coincidence(&comm, first_tags, &rank1_candidates).unwrap();
            let second = reconcile_coincidence(&comm, second_tags, &rank1_candidates).unwrap();
            (first, second)
        });

        let comm = RayonComm::new(0);
        let first = reconcile_coincidence(&comm, first_tags, &rank0_candidates).unwrap();
        rank0_candidates.reverse();
        let second = reconcile_coincidence(&comm, second_tags, &rank0_candidates).unwrap();
        assert_eq!(first, second);

        let flags: Vec<bool> = first.iter().map(|v| v.coincident).collect();
        // Neighbor hexes, both faces of a stacked shell pair, one
        // opposed shell pair.
        assert_eq!(flags, vec![false, true, true, false]);

        let (remote_first, remote_second) = remote.join().unwrap();
        assert_eq!(remote_first, remote_second);
        assert_eq!(
            remote_first.iter().map(|v| v.coincident).collect::<Vec<_>>(),
            flags
        );
    }
}
