use crate::error::{Error, Result};
use super::topology::{Topology, NUM_DIMENSIONS};

/// Extents of the subdomain owned by one process.
///
/// Adjacent subdomains share their boundary plane: the rightmost plane of
/// one subdomain is the leftmost plane of the next. `extent` therefore is
/// (N - 1) / P + 1 nodes per axis, and a node with local index `l` on axis
/// `a` sits at global index `start[a] + l`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Global node counts (Nx, Ny, Nz).
    pub num_cells: [usize; NUM_DIMENSIONS],
    /// Local node counts including the shared boundary planes.
    pub extent: [usize; NUM_DIMENSIONS],
    /// Global index of local node 0 per axis.
    pub start: [usize; NUM_DIMENSIONS],
}

impl Domain {
    pub fn new(
        dims: [usize; NUM_DIMENSIONS],
        coords: [usize; NUM_DIMENSIONS],
        num_cells: [usize; NUM_DIMENSIONS],
    ) -> Result<Self> {
        const AXIS_NAMES: [&str; NUM_DIMENSIONS] = ["x", "y", "z"];
        for axis in 0..NUM_DIMENSIONS {
            if (num_cells[axis] - 1) % dims[axis] != 0 {
                let np = dims.iter().product::<usize>() as i32;
                return Err(Error::invalid_domain(
                    np,
                    dims.map(|d| d as i32).to_vec(),
                    &format!(
                        "Can not partition {} grid nodes in {} for {} processes",
                        num_cells[axis], AXIS_NAMES[axis], dims[axis]
                    ),
                ));
            }
        }

        let mut extent = [0; NUM_DIMENSIONS];
        let mut start = [0; NUM_DIMENSIONS];
        for axis in 0..NUM_DIMENSIONS {
            extent[axis] = (num_cells[axis] - 1) / dims[axis] + 1;
            start[axis] = coords[axis] * (extent[axis] - 1);
            // The stencil and the edge extrapolation both need at least one
            // strictly interior node per axis.
            if extent[axis] < 3 {
                let np = dims.iter().product::<usize>() as i32;
                return Err(Error::invalid_domain(
                    np,
                    dims.map(|d| d as i32).to_vec(),
                    &format!(
                        "Subdomain of {} nodes in {} has no interior",
                        extent[axis], AXIS_NAMES[axis]
                    ),
                ));
            }
        }

        Ok(Self {
            num_cells,
            extent,
            start,
        })
    }

    pub fn from_topology(topology: &Topology, num_cells: [usize; NUM_DIMENSIONS]) -> Result<Self> {
        Self::new(topology.dims, topology.coords, num_cells)
    }

    /// Number of local nodes including boundary planes.
    pub fn size(&self) -> usize {
        self.extent.iter().product()
    }

    /// Number of nodes strictly interior to the subdomain.
    pub fn interior_size(&self) -> usize {
        self.extent.iter().map(|n| n - 2).product()
    }

    /// Physical y coordinate of the node with local index j.
    pub fn global_y(&self, j: usize, dy: f64) -> f64 {
        (self.start[1] + j) as f64 * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_process_extents() {
        let domain = Domain::new([1, 1, 1], [0, 0, 0], [5, 9, 17]).unwrap();
        assert_eq!(domain.extent, [5, 9, 17]);
        assert_eq!(domain.start, [0, 0, 0]);
        assert_eq!(domain.size(), 5 * 9 * 17);
        assert_eq!(domain.interior_size(), 3 * 7 * 15);
    }

    #[test]
    fn test_partitioned_extents_share_boundary_planes() {
        let domain = Domain::new([2, 2, 2], [1, 0, 1], [9, 9, 9]).unwrap();
        assert_eq!(domain.extent, [5, 5, 5]);
        assert_eq!(domain.start, [4, 0, 4]);
    }

    #[test]
    fn test_subdomains_without_interior_are_rejected() {
        // 9 nodes over 4 processes leave 2-node slabs.
        assert!(Domain::new([4, 1, 1], [0, 0, 0], [9, 9, 9]).is_err());
    }

    #[test]
    fn test_indivisible_grid_is_rejected() {
        let err = Domain::new([3, 1, 1], [0, 0, 0], [5, 5, 5]).unwrap_err();
        match err {
            Error::InvalidDomain { np, dims, .. } => {
                assert_eq!(np, 3);
                assert_eq!(dims, vec![3, 1, 1]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_global_y_offsets_by_subdomain_start() {
        let domain = Domain::new([1, 2, 1], [0, 1, 0], [9, 9, 9]).unwrap();
        let dy = 0.125;
        assert!((domain.global_y(0, dy) - 0.5).abs() < 1e-15);
        assert!((domain.global_y(4, dy) - 1.0).abs() < 1e-15);
    }
}
