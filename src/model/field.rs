use super::domain::Domain;
use super::topology::{Direction, NeighborTable, NUM_DIMENSIONS};

/// The field pair (T, T0) of one subdomain.
///
/// Both iterates live in flat buffers with i-major, k-fastest strides, so
/// the stencil sweeps are dense linear reads. `t0` holds the solution of
/// the previous step and is read-only within a step; `t` is written.
pub struct Field {
    pub extent: [usize; NUM_DIMENSIONS],
    pub t: Vec<f64>,
    pub t0: Vec<f64>,
}

impl Field {
    pub fn new(domain: &Domain) -> Self {
        let size = domain.size();
        Self {
            extent: domain.extent,
            t: vec![0.0; size],
            t0: vec![0.0; size],
        }
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.extent[1] + j) * self.extent[2] + k
    }

    /// Copy T into T0 at the start of a step.
    pub fn snapshot(&mut self) {
        self.t0.copy_from_slice(&self.t);
    }

    /// Write the Dirichlet data on every face that lies on the physical
    /// domain boundary. The top of the domain is held at 1.0, the bottom
    /// stays at 0, and the four side walls carry the global y coordinate
    /// of each node. The updater never touches these cells, so one pass at
    /// startup fixes them for the whole run.
    pub fn apply_dirichlet(&mut self, domain: &Domain, neighbors: &NeighborTable, dy: f64) {
        let [nx, ny, nz] = self.extent;
        let idx = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;

        if !neighbors.has(Direction::Top) {
            for i in 0..nx {
                for k in 0..nz {
                    self.t[idx(i, ny - 1, k)] = 1.0;
                }
            }
        }

        if !neighbors.has(Direction::Left) {
            for j in 0..ny {
                for k in 0..nz {
                    self.t[idx(0, j, k)] = domain.global_y(j, dy);
                }
            }
        }

        if !neighbors.has(Direction::Right) {
            for j in 0..ny {
                for k in 0..nz {
                    self.t[idx(nx - 1, j, k)] = domain.global_y(j, dy);
                }
            }
        }

        if !neighbors.has(Direction::Back) {
            for i in 0..nx {
                for j in 0..ny {
                    self.t[idx(i, j, 0)] = domain.global_y(j, dy);
                }
            }
        }

        if !neighbors.has(Direction::Front) {
            for i in 0..nx {
                for j in 0..ny {
                    self.t[idx(i, j, nz - 1)] = domain.global_y(j, dy);
                }
            }
        }
    }
}
