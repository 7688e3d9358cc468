use mpi::topology::CartesianCommunicator;
use mpi::traits::Communicator;
use mpi::Rank;

/// Number of physical dimensions of the domain.
pub const NUM_DIMENSIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

/// The six face directions of a subdomain, in the fixed order used for
/// buffer indexing and message matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// -X
    Left = 0,
    /// +X
    Right = 1,
    /// -Y
    Bottom = 2,
    /// +Y
    Top = 3,
    /// -Z
    Back = 4,
    /// +Z
    Front = 5,
}

impl Direction {
    pub const ALL: [Direction; 2 * NUM_DIMENSIONS] = [
        Direction::Left,
        Direction::Right,
        Direction::Bottom,
        Direction::Top,
        Direction::Back,
        Direction::Front,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Bottom | Direction::Top => Axis::Y,
            Direction::Back | Direction::Front => Axis::Z,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Top => Direction::Bottom,
            Direction::Back => Direction::Front,
            Direction::Front => Direction::Back,
        }
    }
}

/// Peer ranks of the six adjacent subdomains; `None` marks a face on the
/// boundary of the process grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborTable {
    ranks: [Option<Rank>; 2 * NUM_DIMENSIONS],
}

impl NeighborTable {
    pub fn new(ranks: [Option<Rank>; 2 * NUM_DIMENSIONS]) -> Self {
        Self { ranks }
    }

    pub fn get(&self, direction: Direction) -> Option<Rank> {
        self.ranks[direction.index()]
    }

    pub fn has(&self, direction: Direction) -> bool {
        self.ranks[direction.index()].is_some()
    }
}

/// Placement of one process in the cartesian process grid.
#[derive(Debug)]
pub struct Topology {
    pub rank: Rank,
    pub size: Rank,
    pub dims: [usize; NUM_DIMENSIONS],
    pub coords: [usize; NUM_DIMENSIONS],
    pub neighbors: NeighborTable,
}

impl Topology {
    pub fn from_cart_comm(comm: &CartesianCommunicator) -> Self {
        let dims = comm
            .get_layout()
            .dims
            .try_into()
            .map(|arr: [i32; NUM_DIMENSIONS]| [arr[0] as usize, arr[1] as usize, arr[2] as usize])
            .unwrap();
        let coords = comm
            .rank_to_coordinates(comm.rank())
            .try_into()
            .map(|arr: [i32; NUM_DIMENSIONS]| [arr[0] as usize, arr[1] as usize, arr[2] as usize])
            .unwrap();

        let (left, right) = comm.shift(Axis::X as i32, 1);
        let (bottom, top) = comm.shift(Axis::Y as i32, 1);
        let (back, front) = comm.shift(Axis::Z as i32, 1);

        Self {
            rank: comm.rank(),
            size: comm.size(),
            dims,
            coords,
            neighbors: NeighborTable::new([left, right, bottom, top, back, front]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_axis_and_opposite() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.axis(), direction.opposite().axis());
        }
        assert_eq!(Direction::Left.axis(), Axis::X);
        assert_eq!(Direction::Top.axis(), Axis::Y);
        assert_eq!(Direction::Front.axis(), Axis::Z);
        assert_eq!(Direction::Bottom.opposite(), Direction::Top);
    }

    #[test]
    fn test_neighbor_table_lookup() {
        let table = NeighborTable::new([Some(3), None, Some(1), None, None, Some(7)]);
        assert_eq!(table.get(Direction::Left), Some(3));
        assert!(!table.has(Direction::Right));
        assert!(table.has(Direction::Front));
        assert_eq!(table.get(Direction::Front), Some(7));
    }
}
