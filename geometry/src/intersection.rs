//! Segment/segment and segment/envelope intersection at a fixed decimal
//! precision.
//!
//! Every derived coordinate is rounded to the working precision handed in by
//! the caller; cross products and line parameters keep all their digits.
//! Numeric equivalence is decided by a caller supplied tolerance: a computed
//! point that lands slightly outside a segment because of rounding is still
//! accepted when it is within `tolerance` of the segment's coordinate range.

use num_traits::{One, Zero};

use crate::{
    decimal::{within_range, Dec, Precision},
    envelope::Envelope,
    linear::segment::Segment,
    point::Point,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentIntersection {
    None,
    Point(Point),
    /// Collinear overlap, directed from its lower (y, then x) end.
    Segment(Segment),
}

impl SegmentIntersection {
    pub fn is_none(&self) -> bool {
        matches!(self, SegmentIntersection::None)
    }

    /// Equality that treats overlaps as undirected and points as equal within
    /// `tolerance`.
    pub fn same_as(&self, other: &SegmentIntersection, tolerance: Dec) -> bool {
        match (self, other) {
            (SegmentIntersection::None, SegmentIntersection::None) => true,
            (SegmentIntersection::Point(p), SegmentIntersection::Point(q)) => {
                p.approx_eq(q, tolerance)
            }
            (SegmentIntersection::Segment(s), SegmentIntersection::Segment(t)) => {
                let (s, t) = (s.canonical(), t.canonical());
                s.start().approx_eq(&t.start(), tolerance) && s.end().approx_eq(&t.end(), tolerance)
            }
            _ => false,
        }
    }
}

/// Intersection of two segments, computed with the parametric line equations.
///
/// When both segment parameters could be evaluated the parameter of `a` is
/// tried first.
pub fn intersect(
    a: &Segment,
    b: &Segment,
    tolerance: Dec,
    precision: Precision,
) -> SegmentIntersection {
    let (ea, eb) = (a.envelope(), b.envelope());
    if ea.y_min() > eb.y_max()
        || eb.y_min() > ea.y_max()
        || ea.x_min() > eb.x_max()
        || eb.x_min() > ea.x_max()
    {
        return SegmentIntersection::None;
    }

    let (d1x, d1y) = a.dir();
    let (d2x, d2y) = b.dir();
    let denominator = d2y * d1x - d2x * d1y;
    let (ox, oy) = b.start().delta(&a.start());
    let ua_numerator = d2x * oy - d2y * ox;
    let ub_numerator = d1x * oy - d1y * ox;

    // cross products of coordinates at the working precision are exact, so
    // parallel and collinear need no rounding; only derived coordinates are
    // rounded
    if denominator.is_zero() {
        if ua_numerator.is_zero() && ub_numerator.is_zero() {
            return collinear(a, b, tolerance, precision);
        }
        return SegmentIntersection::None;
    }

    let ua = ua_numerator / denominator;
    let candidate = if is_unit(ua) {
        Some(a.point_at(ua, precision))
    } else {
        let ub = ub_numerator / denominator;
        is_unit(ub).then(|| b.point_at(ub, precision))
    };

    match candidate {
        Some(p) if near(&p, &ea, tolerance) && near(&p, &eb, tolerance) => {
            SegmentIntersection::Point(p)
        }
        _ => SegmentIntersection::None,
    }
}

fn is_unit(t: Dec) -> bool {
    t >= Dec::zero() && t <= Dec::one()
}

fn near(p: &Point, envelope: &Envelope, tolerance: Dec) -> bool {
    within_range(p.x(), envelope.x_min(), envelope.x_max(), tolerance)
        && within_range(p.y(), envelope.y_min(), envelope.y_max(), tolerance)
}

/// Overlap of two segments known to lie on one line.
///
/// Both segments are ordered by (y, then x), which is monotonic along any line.
/// The overlap then runs from the later of the two starts to the earlier of the
/// two ends; each of those is an endpoint of one segment contained in the other.
fn collinear(
    a: &Segment,
    b: &Segment,
    tolerance: Dec,
    precision: Precision,
) -> SegmentIntersection {
    let (a, b) = (a.canonical(), b.canonical());
    let from = a.start().max(b.start());
    let to = a.end().min(b.end());

    if from.approx_eq(&to, tolerance) {
        SegmentIntersection::Point(from.with_precision(precision))
    } else if from < to {
        SegmentIntersection::Segment(Segment::with_precision(from, to, precision))
    } else {
        SegmentIntersection::None
    }
}

/// Either endpoint lies inside `envelope` or the segment crosses one of its
/// edges.
pub fn segment_intersects_envelope(
    segment: &Segment,
    envelope: &Envelope,
    tolerance: Dec,
    precision: Precision,
) -> bool {
    envelope.contains(&segment.start())
        || envelope.contains(&segment.end())
        || envelope
            .edges(precision)
            .iter()
            .any(|edge| !intersect(segment, edge, tolerance, precision).is_none())
}

/// Part of `segment` inside `envelope`, keeping the segment's direction.
///
/// Clipping is parametric: every side of the envelope narrows the parameter
/// interval `[t0, t1]` of the segment. Only the clipped coordinates are
/// rounded, and they are clamped onto the envelope so that rounding never
/// leaves them outside.
pub fn clip_to_envelope(
    segment: &Segment,
    envelope: &Envelope,
    tolerance: Dec,
    precision: Precision,
) -> Option<Segment> {
    let (dx, dy) = segment.dir();
    let (x0, y0) = (segment.start().x(), segment.start().y());
    let sides = [
        (-dx, x0 - envelope.x_min()),
        (dx, envelope.x_max() - x0),
        (-dy, y0 - envelope.y_min()),
        (dy, envelope.y_max() - y0),
    ];

    let mut t0 = Dec::zero();
    let mut t1 = Dec::one();
    for (p, q) in sides {
        if p.is_zero() {
            if q < -tolerance {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p.is_sign_negative() {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let clamp = |p: Point| {
        Point::new(
            p.x().clamp(envelope.x_min(), envelope.x_max()),
            p.y().clamp(envelope.y_min(), envelope.y_max()),
            precision,
        )
    };
    let start = if t0.is_zero() {
        segment.start()
    } else {
        segment.point_at(t0, precision)
    };
    let end = if t1.is_one() {
        segment.end()
    } else {
        segment.point_at(t1, precision)
    };
    Some(Segment::with_precision(clamp(start), clamp(end), precision))
}
