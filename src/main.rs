use std::path::Path;

use clap::Parser;
use mpi::traits::*;

use heat3d::cli::Cli;
use heat3d::model::HeatSolverFactory;
use heat3d::output;

fn main() {
    let universe = mpi::initialize().unwrap();
    let world = universe.world();
    let rank = world.rank();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if rank == 0 {
                let _ = err.print();
                world.abort(err.exit_code());
            }
            // Peers park here until the abort tears the group down.
            world.barrier();
            unreachable!()
        }
    };

    let mut solver = match HeatSolverFactory::create(&universe, &cli) {
        Ok(solver) => solver,
        Err(err) => {
            if rank == 0 {
                eprintln!("{}", err);
                world.abort(1);
            }
            world.barrier();
            unreachable!()
        }
    };

    if rank == 0 {
        println!("Running heat3d with the following arguments:");
        println!("number of cells in x:     {}", cli.num_cells_x);
        println!("number of cells in y:     {}", cli.num_cells_y);
        println!("number of cells in z:     {}", cli.num_cells_z);
        println!("max number of iterations: {}", cli.iter_max);
        println!("convergence threshold:    {:e}\n", cli.eps);
    }

    let report = solver.run(cli.iter_max, cli.eps);

    if rank == 0 {
        println!("Computational time (parallel): {:.6}\n", report.elapsed);
        if report.converged {
            println!(
                "Simulation has converged in {} iterations with a convergence threshold of {:e}",
                report.iterations, cli.eps
            );
        } else {
            println!(
                "Simulation did not converge within {} iterations.",
                cli.iter_max
            );
        }
    }

    let error = solver.error_norm();
    if rank == 0 {
        println!("L2-norm error: {:.4} %", 100.0 * error);
    }

    if let Err(err) = output::write_dat(Path::new("output/out.dat"), &solver) {
        eprintln!("{}", err);
        world.abort(1);
    }
}
