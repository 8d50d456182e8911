//! Thin façade over intra-process or inter-process message passing.
//!
//! Messages are contiguous byte slices (no zero-copy guarantees). All
//! handles are waitable but non-blocking; the reconciliation driver calls
//! `.wait()` before it trusts that a buffer is ready.
//!
//! Three backends cover the usual situations: [`NoComm`] for purely serial
//! runs, [`RayonComm`] for multiple "ranks" inside one process (tests,
//! thread-level decomposition), and, behind the `mpi-support` feature,
//! [`MpiComm`] for real distributed runs.

use bytes::Bytes;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Typed message tag, kept separate from raw `u16`s so related exchanges
/// can carve deterministic tag ranges out of a base.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CommTag(u16);

impl CommTag {
    /// Wraps a raw tag value.
    #[inline]
    pub const fn new(tag: u16) -> Self {
        CommTag(tag)
    }

    /// Raw value for the transport layer.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// A tag at a fixed distance from this one (wrapping).
    #[inline]
    pub const fn offset(self, delta: u16) -> Self {
        CommTag(self.0.wrapping_add(delta))
    }
}

/// Non-blocking communication interface (minimal by design).
pub trait Communicator: Send + Sync + 'static {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle;
    fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> Self::RecvHandle;
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

/// Compile-time no-op comm for pure serial runs and unit tests.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn isend(&self, _peer: usize, _tag: u16, _buf: &[u8]) {}
    fn irecv(&self, _peer: usize, _tag: u16, _buf: &mut [u8]) {}
}

// --- RayonComm: intra-process / multi-thread ---

type Key = (usize, usize, u16); // (src, dst, tag)

// One in-flight message per (src, dst, tag); senders overwrite their own
// earlier message if the receiver has not claimed it yet.
static MAILBOX: Lazy<DashMap<Key, Bytes>> = Lazy::new(DashMap::new);

pub struct LocalHandle {
    buf: Arc<Mutex<Option<Vec<u8>>>>,
    handle: Option<JoinHandle<()>>,
}

impl Wait for LocalHandle {
    fn wait(mut self) -> Option<Vec<u8>> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        let mut guard = self.buf.lock().unwrap();
        guard.take()
    }
}

/// In-process communicator: every "rank" is a thread sharing one mailbox.
#[derive(Clone, Debug)]
pub struct RayonComm {
    rank: usize,
}

impl RayonComm {
    pub fn new(rank: usize) -> Self {
        Self { rank }
    }

    /// This communicator's rank.
    pub fn rank(&self) -> usize {
        self.rank
    }
}

impl Communicator for RayonComm {
    type SendHandle = ();
    type RecvHandle = LocalHandle;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle {
        let key = (self.rank, peer, tag);
        MAILBOX.insert(key, Bytes::from(buf.to_vec()));
    }

    fn irecv(&self, peer: usize, tag: u16, _buf: &mut [u8]) -> Self::RecvHandle {
        let key = (peer, self.rank, tag);
        let slot = Arc::new(Mutex::new(None));
        let slot_clone = slot.clone();
        let handle = std::thread::spawn(move || {
            loop {
                if let Some((_, bytes)) = MAILBOX.remove(&key) {
                    let mut guard = slot_clone.lock().unwrap();
                    *guard = Some(bytes.to_vec());
                    break;
                }
                std::thread::yield_now();
            }
        });
        LocalHandle {
            buf: slot,
            handle: Some(handle),
        }
    }
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::{Communicator, Wait};
    use mpi::request::{Request, StaticScope};
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::*;

    /// MPI-backed communicator over `MPI_COMM_WORLD`.
    pub struct MpiComm {
        _universe: mpi::environment::Universe,
        pub world: SimpleCommunicator,
        pub rank: usize,
    }

    impl MpiComm {
        /// Initializes MPI; one instance per process.
        ///
        /// # Panics
        /// Panics if MPI was already initialized.
        pub fn new() -> Self {
            let universe = mpi::initialize().expect("MPI already initialized");
            let world = universe.world();
            let rank = world.rank() as usize;
            Self {
                _universe: universe,
                world,
                rank,
            }
        }
    }

    impl Default for MpiComm {
        fn default() -> Self {
            Self::new()
        }
    }

    // StaticScope requires 'static buffers; each transfer leaks its copy.
    pub struct MpiSendHandle {
        req: Option<Request<'static, [u8], StaticScope>>,
    }

    impl Wait for MpiSendHandle {
        fn wait(mut self) -> Option<Vec<u8>> {
            if let Some(req) = self.req.take() {
                req.wait();
            }
            None
        }
    }

    pub struct MpiRecvHandle {
        req: Option<Request<'static, [u8], StaticScope>>,
        buf_ptr: *mut u8,
        buf_len: usize,
    }

    // The raw pointer targets a leaked buffer only this handle reads, and
    // only after the request completed.
    unsafe impl Send for MpiRecvHandle {}

    impl Wait for MpiRecvHandle {
        fn wait(mut self) -> Option<Vec<u8>> {
            let req = self.req.take()?;
            req.wait();
            let data = unsafe { std::slice::from_raw_parts(self.buf_ptr, self.buf_len) };
            Some(data.to_vec())
        }
    }

    impl Communicator for MpiComm {
        type SendHandle = MpiSendHandle;
        type RecvHandle = MpiRecvHandle;

        fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> MpiSendHandle {
            let buf: &'static [u8] = Box::leak(buf.to_vec().into_boxed_slice());
            let req = self
                .world
                .process_at_rank(peer as i32)
                .immediate_send_with_tag(StaticScope, buf, tag as i32);
            MpiSendHandle { req: Some(req) }
        }

        fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> MpiRecvHandle {
            let recv: &'static mut [u8] = Box::leak(vec![0u8; buf.len()].into_boxed_slice());
            let buf_ptr = recv.as_mut_ptr();
            let buf_len = recv.len();
            let req = self
                .world
                .process_at_rank(peer as i32)
                .immediate_receive_into_with_tag(StaticScope, recv, tag as i32);
            MpiRecvHandle {
                req: Some(req),
                buf_ptr,
                buf_len,
            }
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn comm_tag_offsets_wrap() {
        let base = CommTag::new(0xFFFE);
        assert_eq!(base.offset(1).as_u16(), 0xFFFF);
        assert_eq!(base.offset(3).as_u16(), 1);
        assert_eq!(base.as_u16(), 0xFFFE);
    }

    #[test]
    fn no_comm_never_delivers() {
        let comm = NoComm;
        let mut buf = [0u8; 4];
        let r = comm.irecv(0, 1, &mut buf);
        let s = comm.isend(0, 1, &[1, 2, 3, 4]);
        assert_eq!(s.wait(), None);
        assert_eq!(r.wait(), None);
    }

    #[test]
    #[serial]
    fn rayon_roundtrip_two_ranks() {
        let comm0 = RayonComm::new(0);
        let comm1 = RayonComm::new(1);

        let mut recv_buf = [0u8; 4];
        let recv_handle = comm1.irecv(0, 7, &mut recv_buf);
        let send_handle = comm0.isend(1, 7, &[1, 2, 3, 4]);
        send_handle.wait();

        let data = recv_handle.wait().expect("expected data from rank 0");
        recv_buf.copy_from_slice(&data);
        assert_eq!(&recv_buf, &[1, 2, 3, 4]);
    }

    #[test]
    #[serial]
    fn rayon_tags_are_independent_channels() {
        let comm0 = RayonComm::new(0);
        let comm1 = RayonComm::new(1);
        assert_eq!(comm0.rank(), 0);

        let mut buf_a = [0u8; 1];
        let mut buf_b = [0u8; 1];
        let recv_a = comm1.irecv(0, 21, &mut buf_a);
        let recv_b = comm1.irecv(0, 22, &mut buf_b);
        comm0.isend(1, 22, &[2]);
        comm0.isend(1, 21, &[1]);
        assert_eq!(recv_a.wait(), Some(vec![1]));
        assert_eq!(recv_b.wait(), Some(vec![2]));
    }
}
