//! The per-iteration update of the temperature field.
//!
//! The update runs in phases: the interior first (no cross-process data
//! needed), then the six face interiors once the halo planes have arrived,
//! then the twelve subdomain edges by linear extrapolation, and last the
//! eight corners by averaging. Edges and corners are only touched where
//! every adjoining face has a peer; everywhere else the outermost layer is
//! physical boundary and keeps its Dirichlet data.

use super::field::Field;
use super::halo::HaloExchange;
use super::parameters::Parameters;
use super::topology::{Direction, NeighborTable};

/// 7-point stencil over the strict interior, reading T0 and writing T.
pub fn update_interior(field: &mut Field, params: &Parameters) {
    let [nx, ny, nz] = field.extent;
    let (si, sj) = (ny * nz, nz);
    let [dx, dy, dz] = params.diffusion;
    let t0 = &field.t0;
    let t = &mut field.t;

    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let row = (i * ny + j) * nz;
            for k in 1..nz - 1 {
                let c = row + k;
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + t0[c - si])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + t0[c - 1]);
            }
        }
    }
}

/// Apply the stencil on each face plane that has a peer, with the
/// off-process term supplied by the received halo plane. In-plane indices
/// run strictly interior to the face; the face's own edges and corners are
/// handled afterwards.
pub fn update_faces(
    field: &mut Field,
    halo: &HaloExchange,
    neighbors: &NeighborTable,
    params: &Parameters,
) {
    let [nx, ny, nz] = field.extent;
    let (si, sj) = (ny * nz, nz);
    let [dx, dy, dz] = params.diffusion;
    let idx = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;
    let t0 = &field.t0;
    let t = &mut field.t;

    if neighbors.has(Direction::Left) {
        let plane = halo.plane(Direction::Left);
        let mut counter = 0;
        for j in 1..ny - 1 {
            for k in 1..nz - 1 {
                let c = idx(0, j, k);
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + plane[counter])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + t0[c - 1]);
                counter += 1;
            }
        }
    }

    if neighbors.has(Direction::Right) {
        let plane = halo.plane(Direction::Right);
        let mut counter = 0;
        for j in 1..ny - 1 {
            for k in 1..nz - 1 {
                let c = idx(nx - 1, j, k);
                t[c] = t0[c]
                    + dx * (plane[counter] - 2.0 * t0[c] + t0[c - si])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + t0[c - 1]);
                counter += 1;
            }
        }
    }

    if neighbors.has(Direction::Bottom) {
        let plane = halo.plane(Direction::Bottom);
        let mut counter = 0;
        for i in 1..nx - 1 {
            for k in 1..nz - 1 {
                let c = idx(i, 0, k);
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + t0[c - si])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + plane[counter])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + t0[c - 1]);
                counter += 1;
            }
        }
    }

    if neighbors.has(Direction::Top) {
        let plane = halo.plane(Direction::Top);
        let mut counter = 0;
        for i in 1..nx - 1 {
            for k in 1..nz - 1 {
                let c = idx(i, ny - 1, k);
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + t0[c - si])
                    + dy * (plane[counter] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + t0[c - 1]);
                counter += 1;
            }
        }
    }

    if neighbors.has(Direction::Back) {
        let plane = halo.plane(Direction::Back);
        let mut counter = 0;
        for i in 1..nx - 1 {
            for j in 1..ny - 1 {
                let c = idx(i, j, 0);
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + t0[c - si])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (t0[c + 1] - 2.0 * t0[c] + plane[counter]);
                counter += 1;
            }
        }
    }

    if neighbors.has(Direction::Front) {
        let plane = halo.plane(Direction::Front);
        let mut counter = 0;
        for i in 1..nx - 1 {
            for j in 1..ny - 1 {
                let c = idx(i, j, nz - 1);
                t[c] = t0[c]
                    + dx * (t0[c + si] - 2.0 * t0[c] + t0[c - si])
                    + dy * (t0[c + sj] - 2.0 * t0[c] + t0[c - sj])
                    + dz * (plane[counter] - 2.0 * t0[c] + t0[c - 1]);
                counter += 1;
            }
        }
    }
}

/// Fill the twelve subdomain edges where both adjoining faces have peers
/// by linear extrapolation from the two inward cells of T.
///
/// Edges on a +-X face extrapolate along x, the remaining four edges
/// between the y and z faces extrapolate along z. The convention is fixed:
/// changing it changes individual edge values (though not the converged
/// solution).
pub fn extrapolate_edges(field: &mut Field, neighbors: &NeighborTable) {
    let [nx, ny, nz] = field.extent;
    let idx = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;
    let t = &mut field.t;

    if neighbors.has(Direction::Left) {
        if neighbors.has(Direction::Bottom) {
            for k in 1..nz - 1 {
                t[idx(0, 0, k)] = 2.0 * t[idx(1, 0, k)] - t[idx(2, 0, k)];
            }
        }
        if neighbors.has(Direction::Top) {
            for k in 1..nz - 1 {
                t[idx(0, ny - 1, k)] = 2.0 * t[idx(1, ny - 1, k)] - t[idx(2, ny - 1, k)];
            }
        }
        if neighbors.has(Direction::Back) {
            for j in 1..ny - 1 {
                t[idx(0, j, 0)] = 2.0 * t[idx(1, j, 0)] - t[idx(2, j, 0)];
            }
        }
        if neighbors.has(Direction::Front) {
            for j in 1..ny - 1 {
                t[idx(0, j, nz - 1)] = 2.0 * t[idx(1, j, nz - 1)] - t[idx(2, j, nz - 1)];
            }
        }
    }

    if neighbors.has(Direction::Right) {
        if neighbors.has(Direction::Bottom) {
            for k in 1..nz - 1 {
                t[idx(nx - 1, 0, k)] = 2.0 * t[idx(nx - 2, 0, k)] - t[idx(nx - 3, 0, k)];
            }
        }
        if neighbors.has(Direction::Top) {
            for k in 1..nz - 1 {
                t[idx(nx - 1, ny - 1, k)] =
                    2.0 * t[idx(nx - 2, ny - 1, k)] - t[idx(nx - 3, ny - 1, k)];
            }
        }
        if neighbors.has(Direction::Back) {
            for j in 1..ny - 1 {
                t[idx(nx - 1, j, 0)] = 2.0 * t[idx(nx - 2, j, 0)] - t[idx(nx - 3, j, 0)];
            }
        }
        if neighbors.has(Direction::Front) {
            for j in 1..ny - 1 {
                t[idx(nx - 1, j, nz - 1)] =
                    2.0 * t[idx(nx - 2, j, nz - 1)] - t[idx(nx - 3, j, nz - 1)];
            }
        }
    }

    if neighbors.has(Direction::Back) {
        if neighbors.has(Direction::Bottom) {
            for i in 1..nx - 1 {
                t[idx(i, 0, 0)] = 2.0 * t[idx(i, 0, 1)] - t[idx(i, 0, 2)];
            }
        }
        if neighbors.has(Direction::Top) {
            for i in 1..nx - 1 {
                t[idx(i, ny - 1, 0)] = 2.0 * t[idx(i, ny - 1, 1)] - t[idx(i, ny - 1, 2)];
            }
        }
    }

    if neighbors.has(Direction::Front) {
        if neighbors.has(Direction::Bottom) {
            for i in 1..nx - 1 {
                t[idx(i, 0, nz - 1)] = 2.0 * t[idx(i, 0, nz - 2)] - t[idx(i, 0, nz - 3)];
            }
        }
        if neighbors.has(Direction::Top) {
            for i in 1..nx - 1 {
                t[idx(i, ny - 1, nz - 1)] =
                    2.0 * t[idx(i, ny - 1, nz - 2)] - t[idx(i, ny - 1, nz - 3)];
            }
        }
    }
}

/// Set each corner where all three adjoining faces have peers to the mean
/// of its three inward neighbors. Runs after the edges so the neighbors
/// are final.
pub fn average_corners(field: &mut Field, neighbors: &NeighborTable) {
    let [nx, ny, nz] = field.extent;
    let idx = |i: usize, j: usize, k: usize| (i * ny + j) * nz + k;
    let t = &mut field.t;

    let corners = [
        (Direction::Left, Direction::Bottom, Direction::Back, 0, 0, 0),
        (
            Direction::Left,
            Direction::Bottom,
            Direction::Front,
            0,
            0,
            nz - 1,
        ),
        (Direction::Left, Direction::Top, Direction::Back, 0, ny - 1, 0),
        (
            Direction::Left,
            Direction::Top,
            Direction::Front,
            0,
            ny - 1,
            nz - 1,
        ),
        (
            Direction::Right,
            Direction::Bottom,
            Direction::Back,
            nx - 1,
            0,
            0,
        ),
        (
            Direction::Right,
            Direction::Bottom,
            Direction::Front,
            nx - 1,
            0,
            nz - 1,
        ),
        (
            Direction::Right,
            Direction::Top,
            Direction::Back,
            nx - 1,
            ny - 1,
            0,
        ),
        (
            Direction::Right,
            Direction::Top,
            Direction::Front,
            nx - 1,
            ny - 1,
            nz - 1,
        ),
    ];

    for (face_x, face_y, face_z, i, j, k) in corners {
        if neighbors.has(face_x) && neighbors.has(face_y) && neighbors.has(face_z) {
            let inward_i = if i == 0 { 1 } else { nx - 2 };
            let inward_j = if j == 0 { 1 } else { ny - 2 };
            let inward_k = if k == 0 { 1 } else { nz - 2 };
            t[idx(i, j, k)] = (t[idx(inward_i, j, k)]
                + t[idx(i, inward_j, k)]
                + t[idx(i, j, inward_k)])
                / 3.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::domain::Domain;
    use crate::model::topology::NeighborTable;

    fn solo(n: usize) -> (Domain, Parameters) {
        let domain = Domain::new([1, 1, 1], [0, 0, 0], [n, n, n]).unwrap();
        let params = Parameters::new([n, n, n]);
        (domain, params)
    }

    #[test]
    fn test_interior_update_under_hot_lid() {
        let (domain, params) = solo(5);
        let mut field = Field::new(&domain);
        field.apply_dirichlet(&domain, &NeighborTable::default(), params.spacing[1]);
        field.snapshot();
        update_interior(&mut field, &params);

        let dy = params.diffusion[1];
        // The interior cell right under the lid picks up exactly Dy.
        let idx = field.index(2, 3, 2);
        assert!((field.t[idx] - dy).abs() < 1e-14);
        // A cell with only zero neighbors stays put.
        let idx = field.index(2, 2, 2);
        assert!(field.t[idx].abs() < 1e-15);
        // A cell next to a side wall sees the wall value 0.5 once.
        let idx = field.index(1, 2, 2);
        assert!((field.t[idx] - params.diffusion[0] * 0.5).abs() < 1e-14);
        // Dirichlet faces are untouched.
        let idx = field.index(0, 2, 2);
        assert!((field.t[idx] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_minimal_cube_single_interior_cell() {
        let (domain, params) = solo(3);
        let mut field = Field::new(&domain);
        field.apply_dirichlet(&domain, &NeighborTable::default(), params.spacing[1]);
        field.snapshot();
        update_interior(&mut field, &params);

        // Walls contribute 4 * 0.5, the lid 1.0; each weighted by D = 1/15.
        let idx = field.index(1, 1, 1);
        assert!((field.t[idx] - 0.2).abs() < 1e-14);
    }

    #[test]
    fn test_face_update_uses_received_plane() {
        let (domain, params) = solo(5);
        let mut field = Field::new(&domain);
        let mut halo = HaloExchange::new(&domain);
        let neighbors = NeighborTable::new([Some(1), None, None, None, None, None]);
        halo.recv[Direction::Left.index()].fill(2.0);
        field.snapshot();
        update_faces(&mut field, &halo, &neighbors, &params);

        // Only the -X face interior was written, from the halo plane.
        let idx = field.index(0, 2, 2);
        assert!((field.t[idx] - params.diffusion[0] * 2.0).abs() < 1e-14);
        // In-plane edges of the face are left for the edge pass.
        let idx = field.index(0, 0, 2);
        assert!(field.t[idx].abs() < 1e-15);
        // Other faces stay untouched.
        let idx = field.index(4, 2, 2);
        assert!(field.t[idx].abs() < 1e-15);
    }

    #[test]
    fn test_edge_extrapolation_convention() {
        let (domain, _) = solo(5);
        let mut field = Field::new(&domain);
        let [_, ny, nz] = field.extent;
        for (index, value) in field.t.iter_mut().enumerate() {
            let i = index / (ny * nz);
            *value = (i * i) as f64;
        }
        let neighbors = NeighborTable::new([Some(1), None, Some(2), None, Some(3), None]);
        extrapolate_edges(&mut field, &neighbors);

        // -X/-Y edge extrapolates along x: 2*1 - 4 = -2.
        let idx = field.index(0, 0, 2);
        assert!((field.t[idx] + 2.0).abs() < 1e-15);
        // -X/-Z edge likewise.
        let idx = field.index(0, 2, 0);
        assert!((field.t[idx] + 2.0).abs() < 1e-15);
        // -Y/-Z edge extrapolates along z; values are constant in z here.
        let idx = field.index(2, 0, 0);
        assert!((field.t[idx] - 4.0).abs() < 1e-15);
        // Edges needing an absent neighbor stay untouched (i = 0 plane value).
        let idx = field.index(0, 4, 2);
        assert!(field.t[idx].abs() < 1e-15);
    }

    #[test]
    fn test_corner_average_of_inward_neighbors() {
        let (domain, _) = solo(4);
        let mut field = Field::new(&domain);
        let all = NeighborTable::new([Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]);
        let idx = field.index(1, 0, 0);
        field.t[idx] = 3.0;
        let idx = field.index(0, 1, 0);
        field.t[idx] = 6.0;
        let idx = field.index(0, 0, 1);
        field.t[idx] = 9.0;
        average_corners(&mut field, &all);

        let idx = field.index(0, 0, 0);
        assert!((field.t[idx] - 6.0).abs() < 1e-15);

        // A corner with one missing face neighbor is untouched.
        let partial = NeighborTable::new([Some(1), None, Some(3), Some(4), Some(5), Some(6)]);
        let mut field = Field::new(&domain);
        average_corners(&mut field, &partial);
        let idx = field.index(3, 0, 0);
        assert!(field.t[idx].abs() < 1e-15);
    }
}
