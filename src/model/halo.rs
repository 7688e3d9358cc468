use mpi::topology::CartesianCommunicator;
use mpi::traits::{Communicator, Destination, Source};

use super::domain::Domain;
use super::field::Field;
use super::topology::{Direction, NeighborTable, Topology, NUM_DIMENSIONS};

/// Halo messages are tagged with this base plus the destination rank, so
/// the receiver always expects `HALO_TAG_BASE + own rank` regardless of the
/// direction the plane travels in.
pub const HALO_TAG_BASE: i32 = 100;

/// Send and receive plane buffers for the six face directions.
///
/// The buffers are allocated once at full plane size and reused every
/// iteration; faces without a neighbor keep their buffers but carry no
/// traffic.
pub struct HaloExchange {
    pub(crate) send: [Vec<f64>; 2 * NUM_DIMENSIONS],
    pub(crate) recv: [Vec<f64>; 2 * NUM_DIMENSIONS],
}

impl HaloExchange {
    pub fn new(domain: &Domain) -> Self {
        let [nx, ny, nz] = domain.extent;
        let plane = |a: usize, b: usize| vec![0.0; (a - 1) * (b - 1)];
        let buffers = || {
            [
                plane(ny, nz),
                plane(ny, nz),
                plane(nx, nz),
                plane(nx, nz),
                plane(nx, ny),
                plane(nx, ny),
            ]
        };
        Self {
            send: buffers(),
            recv: buffers(),
        }
    }

    /// Received halo plane for one direction, linearized in the same order
    /// the sender packed it.
    pub fn plane(&self, direction: Direction) -> &[f64] {
        &self.recv[direction.index()]
    }

    /// Linearize the first interior slab of T0 behind each face with a
    /// neighbor into the corresponding send buffer. In-plane indices run
    /// strictly interior to the face; the receiver unpacks in the same
    /// order.
    pub fn pack(&mut self, field: &Field, neighbors: &NeighborTable) {
        let [nx, ny, nz] = field.extent;
        let idx = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;
        let t0 = &field.t0;

        if neighbors.has(Direction::Left) {
            let buffer = &mut self.send[Direction::Left.index()];
            let mut counter = 0;
            for j in 1..ny - 1 {
                for k in 1..nz - 1 {
                    buffer[counter] = t0[idx(1, j, k)];
                    counter += 1;
                }
            }
        }

        if neighbors.has(Direction::Right) {
            let buffer = &mut self.send[Direction::Right.index()];
            let mut counter = 0;
            for j in 1..ny - 1 {
                for k in 1..nz - 1 {
                    buffer[counter] = t0[idx(nx - 2, j, k)];
                    counter += 1;
                }
            }
        }

        if neighbors.has(Direction::Bottom) {
            let buffer = &mut self.send[Direction::Bottom.index()];
            let mut counter = 0;
            for i in 1..nx - 1 {
                for k in 1..nz - 1 {
                    buffer[counter] = t0[idx(i, 1, k)];
                    counter += 1;
                }
            }
        }

        if neighbors.has(Direction::Top) {
            let buffer = &mut self.send[Direction::Top.index()];
            let mut counter = 0;
            for i in 1..nx - 1 {
                for k in 1..nz - 1 {
                    buffer[counter] = t0[idx(i, ny - 2, k)];
                    counter += 1;
                }
            }
        }

        if neighbors.has(Direction::Back) {
            let buffer = &mut self.send[Direction::Back.index()];
            let mut counter = 0;
            for i in 1..nx - 1 {
                for j in 1..ny - 1 {
                    buffer[counter] = t0[idx(i, j, 1)];
                    counter += 1;
                }
            }
        }

        if neighbors.has(Direction::Front) {
            let buffer = &mut self.send[Direction::Front.index()];
            let mut counter = 0;
            for i in 1..nx - 1 {
                for j in 1..ny - 1 {
                    buffer[counter] = t0[idx(i, j, nz - 2)];
                    counter += 1;
                }
            }
        }
    }

    /// Transfer the packed planes to all existing neighbors.
    ///
    /// Sends are posted non-blocking first, then `overlap` runs (the
    /// interior update, which has no cross-process dependency), then the
    /// six receives are drained in direction order and the outstanding
    /// sends are waited on. A send is tagged with the peer's rank so the
    /// matching receive can always expect its own.
    pub fn exchange(
        &mut self,
        comm: &CartesianCommunicator,
        topology: &Topology,
        overlap: impl FnOnce(),
    ) {
        mpi::request::scope(|scope| {
            let mut pending = Vec::with_capacity(2 * NUM_DIMENSIONS);
            for direction in Direction::ALL {
                if let Some(peer) = topology.neighbors.get(direction) {
                    let tag = HALO_TAG_BASE + peer;
                    pending.push(comm.process_at_rank(peer).immediate_send_with_tag(
                        scope,
                        &self.send[direction.index()][..],
                        tag,
                    ));
                }
            }

            overlap();

            let tag = HALO_TAG_BASE + topology.rank;
            for direction in Direction::ALL {
                if let Some(peer) = topology.neighbors.get(direction) {
                    comm.process_at_rank(peer)
                        .receive_into_with_tag(&mut self.recv[direction.index()][..], tag);
                }
            }

            for request in pending {
                request.wait_without_status();
            }
        });
    }
}
