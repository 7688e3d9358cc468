mod convergence;
mod domain;
mod factory;
mod field;
mod halo;
mod heat;
mod parameters;
mod stencil;
mod topology;

pub use convergence::ConvergenceMonitor;
pub use domain::Domain;
pub use factory::HeatSolverFactory;
pub use field::Field;
pub use halo::{HaloExchange, HALO_TAG_BASE};
pub use heat::{HeatSolver, RunReport};
pub use parameters::{Parameters, ALPHA, CFL, DOMAIN_LENGTH};
pub use topology::{Axis, Direction, NeighborTable, Topology, NUM_DIMENSIONS};
