//! Post-processing dump of the converged field.
//!
//! Rank 0 serializes every subdomain into a single Tecplot-style file:
//! one header, then one zone per process in rank order, nodes listed
//! i-fastest. Ranks above 0 ship their field and their process-grid
//! coordinates to rank 0 and are done.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use mpi::traits::{Communicator, Destination, Source};

use crate::error::Result;
use crate::model::{Field, HeatSolver, NUM_DIMENSIONS};

/// Field zones travel with this base plus the sending rank.
pub const FIELD_TAG_BASE: i32 = 200;
/// Process-grid coordinates travel with this base plus the sending rank.
pub const COORDS_TAG_BASE: i32 = 300;

pub fn write_dat(path: &Path, solver: &HeatSolver) -> Result<()> {
    let comm = &solver.cart_comm;
    let rank = solver.topology.rank;
    let size = solver.topology.size;

    if rank > 0 {
        let buffer = linearize_i_fastest(&solver.field);
        let coords = solver.topology.coords.map(|c| c as i32);
        let root = comm.process_at_rank(0);
        root.send_with_tag(&buffer[..], FIELD_TAG_BASE + rank);
        root.send_with_tag(&coords[..], COORDS_TAG_BASE + rank);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(fs::File::create(path)?);

    let extent = solver.field.extent;
    let spacing = solver.params.spacing;
    let with_rank = size != 1;

    write_header(&mut out, with_rank)?;

    let own = linearize_i_fastest(&solver.field);
    write_zone(&mut out, extent, spacing, solver.topology.coords, &own, 0, with_rank)?;

    let mut buffer = vec![0.0f64; own.len()];
    for recv_rank in 1..size {
        let process = comm.process_at_rank(recv_rank);
        process.receive_into_with_tag(&mut buffer[..], FIELD_TAG_BASE + recv_rank);
        let mut coords = [0i32; NUM_DIMENSIONS];
        process.receive_into_with_tag(&mut coords[..], COORDS_TAG_BASE + recv_rank);
        write_zone(
            &mut out,
            extent,
            spacing,
            coords.map(|c| c as usize),
            &buffer,
            recv_rank,
            with_rank,
        )?;
    }

    out.flush()?;
    Ok(())
}

/// Local field values in i-fastest order over (i, j, k), the node order of
/// a POINT-format zone.
fn linearize_i_fastest(field: &Field) -> Vec<f64> {
    let [nx, ny, nz] = field.extent;
    let mut buffer = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                buffer.push(field.t[field.index(i, j, k)]);
            }
        }
    }
    buffer
}

fn write_header(out: &mut impl Write, with_rank: bool) -> io::Result<()> {
    writeln!(out, "TITLE=\"out\"")?;
    if with_rank {
        writeln!(out, "VARIABLES = \"X\", \"Y\", \"Z\", \"T\", \"rank\"")?;
    } else {
        writeln!(out, "VARIABLES = \"X\", \"Y\", \"Z\", \"T\"")?;
    }
    Ok(())
}

fn write_zone(
    out: &mut impl Write,
    extent: [usize; NUM_DIMENSIONS],
    spacing: [f64; NUM_DIMENSIONS],
    coords: [usize; NUM_DIMENSIONS],
    values: &[f64],
    zone_rank: i32,
    with_rank: bool,
) -> io::Result<()> {
    let [nx, ny, nz] = extent;
    writeln!(
        out,
        "ZONE T = \"{}\", I={}, J={}, K={}, F=POINT",
        zone_rank, nx, ny, nz
    )?;

    let mut counter = 0;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let x = (coords[0] * (nx - 1) + i) as f64 * spacing[0];
                let y = (coords[1] * (ny - 1) + j) as f64 * spacing[1];
                let z = (coords[2] * (nz - 1) + k) as f64 * spacing[2];
                write!(out, "{:>15.5e}{:>15.5e}{:>15.5e}{:>15.5e}", x, y, z, values[counter])?;
                counter += 1;
                if with_rank {
                    writeln!(out, "{:>5}", zone_rank)?;
                } else {
                    writeln!(out)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Domain;

    #[test]
    fn test_header_lists_rank_variable_only_for_multiple_zones() {
        let mut single = Vec::new();
        write_header(&mut single, false).unwrap();
        let text = String::from_utf8(single).unwrap();
        assert!(text.contains("\"X\", \"Y\", \"Z\", \"T\"\n"));
        assert!(!text.contains("rank"));

        let mut multi = Vec::new();
        write_header(&mut multi, true).unwrap();
        assert!(String::from_utf8(multi).unwrap().contains("\"rank\""));
    }

    #[test]
    fn test_zone_lists_nodes_i_fastest() {
        let domain = Domain::new([1, 1, 1], [0, 0, 0], [3, 3, 3]).unwrap();
        let mut field = Field::new(&domain);
        for (index, value) in field.t.iter_mut().enumerate() {
            *value = index as f64;
        }
        let values = linearize_i_fastest(&field);

        let mut out = Vec::new();
        write_zone(&mut out, [3, 3, 3], [0.5; 3], [0, 0, 0], &values, 0, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 27);
        assert!(lines[0].starts_with("ZONE T = \"0\", I=3, J=3, K=3"));

        let parse = |line: &str| -> Vec<f64> {
            line.split_whitespace().map(|v| v.parse().unwrap()).collect()
        };
        // Second node advances x by one spacing and holds T(i=1, 0, 0).
        let node = parse(lines[2]);
        assert!((node[0] - 0.5).abs() < 1e-12);
        assert!(node[1].abs() < 1e-12);
        assert!((node[3] - field.t[field.index(1, 0, 0)]).abs() < 1e-12);
        // Fourth node steps j instead.
        let node = parse(lines[4]);
        assert!(node[0].abs() < 1e-12);
        assert!((node[1] - 0.5).abs() < 1e-12);
        assert!((node[3] - field.t[field.index(0, 1, 0)]).abs() < 1e-12);
    }

    #[test]
    fn test_zone_offsets_coordinates_by_subdomain_origin() {
        let values = vec![0.0; 27];
        let mut out = Vec::new();
        write_zone(&mut out, [3, 3, 3], [0.25; 3], [1, 0, 2], &values, 3, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first = text.lines().nth(1).unwrap();
        let node: Vec<f64> = first
            .split_whitespace()
            .map(|v| v.parse().unwrap())
            .collect();
        assert!((node[0] - 0.5).abs() < 1e-12);
        assert!(node[1].abs() < 1e-12);
        assert!((node[2] - 1.0).abs() < 1e-12);
        assert!((node[4] - 3.0).abs() < 1e-12);
    }
}
