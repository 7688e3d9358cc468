use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Solves the 3D transient heat equation on a structured cartesian grid using MPI",
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Number of grid nodes in the x direction
    pub num_cells_x: usize,
    /// Number of grid nodes in the y direction
    pub num_cells_y: usize,
    /// Number of grid nodes in the z direction
    pub num_cells_z: usize,
    /// Maximum number of iterations for the time loop
    pub iter_max: usize,
    /// Convergence threshold on the normalised residual
    pub eps: f64,
}

impl Cli {
    pub fn num_cells(&self) -> [usize; 3] {
        [self.num_cells_x, self.num_cells_y, self.num_cells_z]
    }

    pub fn validate_parameters(&self) -> Result<(), String> {
        if self.num_cells().iter().any(|&n| n < 3) {
            return Err("Each axis needs at least 3 grid nodes".to_string());
        }
        if self.iter_max == 0 {
            return Err("Maximum number of iterations must be positive".to_string());
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err("Convergence threshold must be finite and >= 0".to_string());
        }
        Ok(())
    }
}
