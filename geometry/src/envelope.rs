use std::fmt;

use crate::{
    decimal::{Dec, Precision},
    linear::segment::Segment,
    point::Point,
};

/// Axis aligned bounding rectangle. Bounds are inclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Envelope {
    x_min: Dec,
    x_max: Dec,
    y_min: Dec,
    y_max: Dec,
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} .. {}] x [{} .. {}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

impl Envelope {
    /// Bounds may be given in any order.
    pub fn from_bounds(x1: Dec, x2: Dec, y1: Dec, y2: Dec) -> Self {
        Self {
            x_min: x1.min(x2),
            x_max: x1.max(x2),
            y_min: y1.min(y2),
            y_max: y1.max(y2),
        }
    }

    pub fn from_point(p: &Point) -> Self {
        Self::from_bounds(p.x(), p.x(), p.y(), p.y())
    }

    pub fn new(a: &Point, b: &Point) -> Self {
        Self::from_bounds(a.x(), b.x(), a.y(), b.y())
    }

    pub fn x_min(&self) -> Dec {
        self.x_min
    }

    pub fn x_max(&self) -> Dec {
        self.x_max
    }

    pub fn y_min(&self) -> Dec {
        self.y_min
    }

    pub fn y_max(&self) -> Dec {
        self.y_max
    }

    pub fn width(&self) -> Dec {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> Dec {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.contains_xy(p.x(), p.y())
    }

    fn contains_xy(&self, x: Dec, y: Dec) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }

    /// Corners in the order lower-left, lower-right, upper-right, upper-left.
    pub fn corners(&self, precision: Precision) -> [Point; 4] {
        [
            Point::new(self.x_min, self.y_min, precision),
            Point::new(self.x_max, self.y_min, precision),
            Point::new(self.x_max, self.y_max, precision),
            Point::new(self.x_min, self.y_max, precision),
        ]
    }

    /// Boundary segments in the order top, right, bottom, left.
    pub fn edges(&self, precision: Precision) -> [Segment; 4] {
        let [ll, lr, ur, ul] = self.corners(precision);
        [
            Segment::new(ul, ur),
            Segment::new(ur, lr),
            Segment::new(lr, ll),
            Segment::new(ll, ul),
        ]
    }

    /// Touching rectangles intersect.
    pub fn intersects(&self, other: &Envelope) -> bool {
        let corner_inside = |outer: &Envelope, inner: &Envelope| {
            outer.contains_xy(inner.x_min, inner.y_min)
                || outer.contains_xy(inner.x_max, inner.y_min)
                || outer.contains_xy(inner.x_max, inner.y_max)
                || outer.contains_xy(inner.x_min, inner.y_max)
        };
        // a cross shaped overlap leaves every corner outside the other rectangle
        let straddles = |a: &Envelope, b: &Envelope| {
            a.x_min <= b.x_min && a.x_max >= b.x_max && b.y_min <= a.y_min && b.y_max >= a.y_max
        };

        corner_inside(self, other)
            || corner_inside(other, self)
            || straddles(self, other)
            || straddles(other, self)
    }

    pub fn union(&self, other: &Envelope) -> Envelope {
        Envelope {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn union_all<'a>(envelopes: impl IntoIterator<Item = &'a Envelope>) -> Option<Envelope> {
        envelopes
            .into_iter()
            .copied()
            .reduce(|acc, envelope| acc.union(&envelope))
    }

    /// Grows every side outward by `margin`.
    pub fn expand_by(&self, margin: Dec) -> Envelope {
        assert!(!margin.is_sign_negative(), "envelope margin must not be negative");
        Envelope {
            x_min: self.x_min - margin,
            x_max: self.x_max + margin,
            y_min: self.y_min - margin,
            y_max: self.y_max + margin,
        }
    }
}
