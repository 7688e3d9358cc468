use mpi::collective::SystemOperation;
use mpi::topology::CartesianCommunicator;
use mpi::traits::*;

use super::field::Field;

/// Distributed convergence test on the normalised residual.
///
/// The residual of the first iteration, reduced with MIN across the group,
/// becomes the normaliser every process uses from then on. Each iteration
/// the per-process break flags are reduced with MAX, so the loop stops as
/// soon as any process reports a normalised residual below the threshold.
pub struct ConvergenceMonitor {
    eps: f64,
    norm: f64,
}

impl ConvergenceMonitor {
    pub fn new(eps: f64) -> Self {
        Self { eps, norm: 1.0 }
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Max |T - T0| over the strict interior of the subdomain.
    pub fn local_residual(field: &Field) -> f64 {
        let [nx, ny, nz] = field.extent;
        let mut res = 0.0f64;
        for i in 1..nx - 1 {
            for j in 1..ny - 1 {
                let row = (i * ny + j) * nz;
                for k in 1..nz - 1 {
                    let c = row + k;
                    res = res.max((field.t[c] - field.t0[c]).abs());
                }
            }
        }
        res
    }

    /// Collective break decision for one iteration. Returns true when the
    /// group agrees to leave the time loop.
    pub fn check(&mut self, comm: &CartesianCommunicator, iteration: usize, res: f64) -> bool {
        if iteration == 0 {
            let local = if res > 0.0 { res } else { 1.0 };
            let mut global = 0.0;
            comm.all_reduce_into(&local, &mut global, SystemOperation::min());
            self.norm = global;
        }

        let converged = (res / self.norm < self.eps) as i32;
        let mut global_converged = 0;
        comm.all_reduce_into(&converged, &mut global_converged, SystemOperation::max());
        global_converged != 0
    }
}
