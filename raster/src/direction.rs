use geometry::Dec;
use num_traits::Zero;

/// Side of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Position in the `[top, right, bottom, left]` order used by
    /// `Envelope::edges`.
    pub fn index(self) -> usize {
        match self {
            Edge::Top => 0,
            Edge::Right => 1,
            Edge::Bottom => 2,
            Edge::Left => 3,
        }
    }
}

/// Compass octant a segment leaves a cell through. Rows grow northwards and
/// columns eastwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// `(row, col)` step to the neighbouring cell.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Direction::N => (1, 0),
            Direction::NE => (1, 1),
            Direction::E => (0, 1),
            Direction::SE => (-1, 1),
            Direction::S => (-1, 0),
            Direction::SW => (-1, -1),
            Direction::W => (0, -1),
            Direction::NW => (1, -1),
        }
    }

    /// Edges worth testing in a cell entered while travelling this way, in the
    /// order they are tested. Edges the segment moves away from are left out:
    /// the segment can only touch them at its entry point.
    pub fn edge_order(self) -> &'static [Edge] {
        match self {
            Direction::N => &[Edge::Top, Edge::Right, Edge::Left],
            Direction::NE => &[Edge::Top, Edge::Right],
            Direction::E => &[Edge::Right, Edge::Bottom, Edge::Top],
            Direction::SE => &[Edge::Right, Edge::Bottom],
            Direction::S => &[Edge::Bottom, Edge::Left, Edge::Right],
            Direction::SW => &[Edge::Bottom, Edge::Left],
            Direction::W => &[Edge::Left, Edge::Top, Edge::Bottom],
            Direction::NW => &[Edge::Left, Edge::Top],
        }
    }

    /// Octant from the vertical and horizontal components of a movement,
    /// `None` when neither component is set or both senses of one axis are.
    pub fn from_components(north: bool, south: bool, east: bool, west: bool) -> Option<Self> {
        match (north, south, east, west) {
            (true, false, false, false) => Some(Direction::N),
            (true, false, true, false) => Some(Direction::NE),
            (false, false, true, false) => Some(Direction::E),
            (false, true, true, false) => Some(Direction::SE),
            (false, true, false, false) => Some(Direction::S),
            (false, true, false, true) => Some(Direction::SW),
            (false, false, false, true) => Some(Direction::W),
            (true, false, false, true) => Some(Direction::NW),
            _ => None,
        }
    }

    /// Octant a direction vector points into, `None` for a zero vector.
    pub fn of_travel(dx: Dec, dy: Dec) -> Option<Self> {
        Self::from_components(
            dy > Dec::zero(),
            dy < Dec::zero(),
            dx > Dec::zero(),
            dx < Dec::zero(),
        )
    }
}
