pub mod decimal;
pub mod envelope;
pub mod geometry;
pub mod intersection;
pub mod linear;
pub mod network;
pub mod point;

pub use decimal::{approx_eq, within_range, Dec, Precision, Rounding};
pub use envelope::Envelope;
pub use geometry::Geometry;
pub use intersection::SegmentIntersection;
pub use linear::segment::Segment;
pub use network::Network;
pub use point::Point;
