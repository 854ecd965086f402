use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    decimal::{Dec, Precision},
    envelope::Envelope,
    point::Point,
};

/// Directed line segment. A segment whose ends coincide stands for a point.
#[derive(Clone, Copy)]
pub struct Segment {
    start: Point,
    end: Point,
    precision: Precision,
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.start.x().round_dp(4),
            self.start.y().round_dp(4),
            self.end.x().round_dp(4),
            self.end.y().round_dp(4)
        )
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl Segment {
    /// Works at the finer precision of the two endpoints.
    pub fn new(start: Point, end: Point) -> Self {
        let precision = start.precision().finer(end.precision());
        Self {
            start,
            end,
            precision,
        }
    }

    pub fn with_precision(start: Point, end: Point, precision: Precision) -> Self {
        Self {
            start: start.with_precision(precision),
            end: end.with_precision(precision),
            precision,
        }
    }

    pub fn from_coords(x1: Dec, y1: Dec, x2: Dec, y2: Dec, precision: Precision) -> Self {
        Self::with_precision(
            Point::new(x1, y1, precision),
            Point::new(x2, y2, precision),
            precision,
        )
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn dir(&self) -> (Dec, Dec) {
        self.start.delta(&self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn length(&self) -> Dec {
        self.start.distance(&self.end, self.precision)
    }

    pub fn flip(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            precision: self.precision,
        }
    }

    /// Same segment directed from its lower (y, then x) endpoint.
    pub fn canonical(&self) -> Self {
        if self.end < self.start {
            self.flip()
        } else {
            *self
        }
    }

    pub fn eq_ignore_direction(&self, other: &Segment) -> bool {
        self == other || (self.start == other.end && self.end == other.start)
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::new(&self.start, &self.end)
    }

    /// Point at parameter `t`, where `0` is the start and `1` the end.
    pub fn point_at(&self, t: Dec, precision: Precision) -> Point {
        let (dx, dy) = self.dir();
        Point::new(
            self.start.x() + precision.round(dx * t),
            self.start.y() + precision.round(dy * t),
            precision,
        )
    }

    /// Splits into the part before `at` and the part after it. `at` is expected
    /// to lie on the segment.
    pub fn split_at(&self, at: Point) -> (Segment, Segment) {
        (
            Segment::with_precision(self.start, at, self.precision),
            Segment::with_precision(at, self.end, self.precision),
        )
    }
}
