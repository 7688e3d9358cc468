//! Distributed-memory solver for the 3D transient heat equation
//! T_t = alpha * (T_xx + T_yy + T_zz) on a structured cartesian grid.
//!
//! The global grid is partitioned onto a 3D process topology; each process
//! iterates an explicit Euler / central-stencil update on its subdomain and
//! exchanges one-cell halo planes with up to six neighbors per step until a
//! global convergence criterion fires.

pub mod cli;
pub mod error;
pub mod model;
pub mod output;
