use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::decimal::{approx_eq, Dec, Precision};

/// Planar coordinate stored at a fixed decimal scale.
///
/// Points compare by `y` first and `x` second. The precision is carried along
/// for operations deriving new values from the point and takes no part in
/// equality or ordering.
#[derive(Clone, Copy)]
pub struct Point {
    x: Dec,
    y: Dec,
    precision: Precision,
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x.normalize(), self.y.normalize())
    }
}

impl Point {
    pub fn new(x: Dec, y: Dec, precision: Precision) -> Self {
        Self {
            x: precision.round(x),
            y: precision.round(y),
            precision,
        }
    }

    pub fn x(&self) -> Dec {
        self.x
    }

    pub fn y(&self) -> Dec {
        self.y
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn with_precision(&self, precision: Precision) -> Self {
        Self::new(self.x, self.y, precision)
    }

    /// Components of the vector pointing from `self` to `other`.
    pub fn delta(&self, other: &Point) -> (Dec, Dec) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn distance(&self, other: &Point, precision: Precision) -> Dec {
        let (dx, dy) = self.delta(other);
        precision.sqrt(precision.round(dx * dx + dy * dy))
    }

    /// Both coordinates agree within `tolerance`.
    pub fn approx_eq(&self, other: &Point, tolerance: Dec) -> bool {
        approx_eq(self.x, other.x, tolerance) && approx_eq(self.y, other.y, tolerance)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then_with(|| self.x.cmp(&other.x))
    }
}
