use mpi::environment::Universe;
use mpi::ffi;
use mpi::topology::CartesianCommunicator;
use mpi::traits::Communicator;

use super::topology::{Topology, NUM_DIMENSIONS};
use super::{Domain, Field, HeatSolver, Parameters};
use crate::cli::Cli;
use crate::error::{Error, Result};

pub struct HeatSolverFactory;

impl HeatSolverFactory {
    /// Build one process's solver: factor the world into a 3D process
    /// grid, create the cartesian communicator, derive the subdomain and
    /// initialize the field. Fails before any computation when the grid
    /// cannot be partitioned for the given process count.
    pub fn create(universe: &Universe, cli: &Cli) -> Result<HeatSolver> {
        cli.validate_parameters().map_err(Error::InvalidParameters)?;

        let cart_comm = Self::create_cart_comm(&universe.world())?;
        let topology = Topology::from_cart_comm(&cart_comm);
        let domain = Domain::from_topology(&topology, cli.num_cells())?;
        let params = Parameters::new(cli.num_cells());

        let mut field = Field::new(&domain);
        field.apply_dirichlet(&domain, &topology.neighbors, params.spacing[1]);

        Ok(HeatSolver::new(cart_comm, topology, domain, params, field))
    }

    fn create_cart_comm(comm: &impl Communicator) -> Result<CartesianCommunicator> {
        let dims = Self::create_dims(comm.size())?;
        comm.create_cartesian_communicator(&dims[..], &[false; NUM_DIMENSIONS], true)
            .ok_or(Error::invalid_domain(
                comm.size(),
                dims,
                "Failed to create Cartesian communicator",
            ))
    }

    fn create_dims(np: i32) -> Result<Vec<i32>> {
        if np <= 0 {
            return Err(Error::InvalidParameters(
                "Number of processes must be positive".to_string(),
            ));
        }

        let mut dims = vec![0; NUM_DIMENSIONS];
        let ndims = NUM_DIMENSIONS as i32;

        let result = unsafe { ffi::MPI_Dims_create(np, ndims, dims.as_mut_ptr()) };

        if result != ffi::MPI_SUCCESS as i32 {
            return Err(Error::mpi_error(result, "Failed to create dimensions"));
        }

        Ok(dims)
    }
}
