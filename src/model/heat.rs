use mpi::collective::SystemOperation;
use mpi::topology::CartesianCommunicator;
use mpi::traits::*;

use super::convergence::ConvergenceMonitor;
use super::domain::Domain;
use super::field::Field;
use super::halo::HaloExchange;
use super::parameters::Parameters;
use super::stencil;
use super::topology::Topology;

/// One process's share of the distributed heat equation solve.
pub struct HeatSolver {
    pub cart_comm: CartesianCommunicator,
    pub topology: Topology,
    pub domain: Domain,
    pub params: Parameters,
    pub field: Field,
    halo: HaloExchange,
}

/// Outcome of the time loop.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub converged: bool,
    pub iterations: usize,
    pub elapsed: f64,
}

impl HeatSolver {
    pub fn new(
        cart_comm: CartesianCommunicator,
        topology: Topology,
        domain: Domain,
        params: Parameters,
        field: Field,
    ) -> Self {
        let halo = HaloExchange::new(&domain);
        Self {
            cart_comm,
            topology,
            domain,
            params,
            field,
            halo,
        }
    }

    /// Run the outer time loop until the group converges or `iter_max` is
    /// reached. Per iteration: snapshot T into T0, pack and post the halo
    /// sends, update the interior while the planes are in flight, drain
    /// the receives, finish faces, edges and corners, then take the
    /// collective break decision.
    pub fn run(&mut self, iter_max: usize, eps: f64) -> RunReport {
        let mut monitor = ConvergenceMonitor::new(eps);
        let mut converged = false;
        let mut iterations = iter_max;
        let start = mpi::time();

        for iteration in 0..iter_max {
            self.field.snapshot();
            self.halo.pack(&self.field, &self.topology.neighbors);

            let field = &mut self.field;
            let params = &self.params;
            self.halo.exchange(&self.cart_comm, &self.topology, || {
                stencil::update_interior(field, params)
            });

            stencil::update_faces(&mut self.field, &self.halo, &self.topology.neighbors, &self.params);
            stencil::extrapolate_edges(&mut self.field, &self.topology.neighbors);
            stencil::average_corners(&mut self.field, &self.topology.neighbors);

            let res = ConvergenceMonitor::local_residual(&self.field);
            if monitor.check(&self.cart_comm, iteration, res) {
                converged = true;
                iterations = iteration;
                break;
            }
        }

        RunReport {
            converged,
            iterations,
            elapsed: mpi::time() - start,
        }
    }

    /// Mean absolute deviation of the interior from the analytic steady
    /// state T(y) = y, summed over all processes.
    pub fn error_norm(&self) -> f64 {
        let [nx, ny, nz] = self.field.extent;
        let dy = self.params.spacing[1];

        let mut error = 0.0;
        for k in 1..nz - 1 {
            for j in 1..ny - 1 {
                for i in 1..nx - 1 {
                    let c = self.field.index(i, j, k);
                    error += (self.field.t[c] - self.domain.global_y(j, dy)).abs();
                }
            }
        }
        error /= self.domain.interior_size() as f64;

        let mut global_error = 0.0;
        self.cart_comm
            .all_reduce_into(&error, &mut global_error, SystemOperation::sum());
        global_error
    }
}
