use crate::{envelope::Envelope, linear::segment::Segment, point::Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    Point(Point),
    Segment(Segment),
    Envelope(Envelope),
}

impl Geometry {
    pub fn envelope(&self) -> Envelope {
        match self {
            Geometry::Point(p) => Envelope::from_point(p),
            Geometry::Segment(s) => s.envelope(),
            Geometry::Envelope(e) => *e,
        }
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Geometry::Point(value)
    }
}

impl From<Segment> for Geometry {
    fn from(value: Segment) -> Self {
        Geometry::Segment(value)
    }
}

impl From<Envelope> for Geometry {
    fn from(value: Envelope) -> Self {
        Geometry::Envelope(value)
    }
}

/// Smallest envelope covering every geometry, `None` for an empty input.
pub fn envelope_of<G>(items: impl IntoIterator<Item = G>) -> Option<Envelope>
where
    G: Into<Geometry>,
{
    items
        .into_iter()
        .map(|g| g.into().envelope())
        .reduce(|acc, e| acc.union(&e))
}
