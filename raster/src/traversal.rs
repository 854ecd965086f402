//! Walks a segment through the cells of a grid, crediting every cell with the
//! length of the piece of segment inside it.
//!
//! A traversal keeps the part of the segment not yet attributed, the current
//! cell and the direction the previous cell was left in. Every step intersects
//! the remaining segment with the edges of the current cell that lie ahead of
//! it, splits off the piece inside the cell and moves to the neighbour behind
//! the exit point.

use geometry::{
    approx_eq,
    intersection::{clip_to_envelope, intersect},
    Dec, Envelope, Point, Precision, Segment, SegmentIntersection,
};
use itertools::Itertools;
use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    direction::Direction,
    grid::{Dimensions, Grid},
};

/// Outcome of attributing a segment to one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Piece of the segment inside the cell.
    pub consumed: Segment,
    /// Rest of the segment past the exit point.
    pub remainder: Option<Segment>,
    /// Side the segment leaves the cell through. Set whenever there is a
    /// remainder.
    pub exit: Option<Direction>,
}

/// Splits `remaining` at the point where it leaves `cell`.
///
/// `direction` selects the edges worth testing, see [`Direction::edge_order`].
/// When the segment ends inside the cell, or on its boundary, all of it is
/// consumed.
///
/// # Panics
///
/// When the segment leaves the cell through an edge it does not move towards,
/// or through an edge `direction` does not test.
pub fn step(
    remaining: &Segment,
    cell: &Envelope,
    direction: Direction,
    tolerance: Dec,
    precision: Precision,
) -> StepResult {
    let start = remaining.start();
    let edges = cell.edges(precision);

    let exit_point = direction.edge_order().iter().find_map(|edge| {
        let candidate = match intersect(remaining, &edges[edge.index()], tolerance, precision) {
            SegmentIntersection::None => return None,
            SegmentIntersection::Point(p) => p,
            SegmentIntersection::Segment(overlap) => farthest_from(&start, &overlap, precision),
        };
        (!candidate.approx_eq(&start, tolerance)).then_some(candidate)
    });

    let exit_point = match exit_point {
        Some(p) if !p.approx_eq(&remaining.end(), tolerance) => p,
        _ => {
            assert!(
                cell.expand_by(tolerance).contains(&remaining.end()),
                "{remaining:?} leaves cell {cell:?} through no exit boundary"
            );
            return StepResult {
                consumed: *remaining,
                remainder: None,
                exit: None,
            }
        }
    };

    let (dx, dy) = remaining.dir();
    let north = approx_eq(exit_point.y(), cell.y_max(), tolerance) && dy > Dec::zero();
    let south = approx_eq(exit_point.y(), cell.y_min(), tolerance) && dy < Dec::zero();
    let east = approx_eq(exit_point.x(), cell.x_max(), tolerance) && dx > Dec::zero();
    let west = approx_eq(exit_point.x(), cell.x_min(), tolerance) && dx < Dec::zero();
    let exit = Direction::from_components(north, south, east, west).unwrap_or_else(|| {
        panic!("{remaining:?} leaves cell {cell:?} at {exit_point:?} through no exit boundary")
    });

    // the next cell starts exactly on the boundary it was entered through
    let x = if east {
        cell.x_max()
    } else if west {
        cell.x_min()
    } else {
        exit_point.x().clamp(cell.x_min(), cell.x_max())
    };
    let y = if north {
        cell.y_max()
    } else if south {
        cell.y_min()
    } else {
        exit_point.y().clamp(cell.y_min(), cell.y_max())
    };
    let (consumed, remainder) = remaining.split_at(Point::new(x, y, precision));

    StepResult {
        consumed,
        remainder: Some(remainder),
        exit: Some(exit),
    }
}

fn farthest_from(start: &Point, overlap: &Segment, precision: Precision) -> Point {
    let to_start = overlap.start().distance(start, precision);
    let to_end = overlap.end().distance(start, precision);
    if to_end >= to_start {
        overlap.end()
    } else {
        overlap.start()
    }
}

/// Direction the walk is taken to have entered the grid in: away from the
/// grid boundaries `start` lies on, otherwise along the travel.
fn entry_direction(
    start: &Point,
    bounds: &Envelope,
    (dx, dy): (Dec, Dec),
    tolerance: Dec,
) -> Option<Direction> {
    Direction::from_components(
        approx_eq(start.y(), bounds.y_min(), tolerance),
        approx_eq(start.y(), bounds.y_max(), tolerance),
        approx_eq(start.x(), bounds.x_min(), tolerance),
        approx_eq(start.x(), bounds.x_max(), tolerance),
    )
    .or_else(|| Direction::of_travel(dx, dy))
}

/// Cell index along one axis for a traversal starting at `value`. A start on a
/// grid line belongs to the cell the segment moves into.
fn start_index(dims: &Dimensions, value: Dec, origin: Dec, travel: Dec, tolerance: Dec) -> i64 {
    match dims.line_near(value, origin, tolerance) {
        Some(line) if travel < Dec::zero() => line.saturating_sub(1),
        Some(line) => line,
        None => dims.band(value, origin),
    }
}

/// Adds `length * factor` of `segment` to every grid cell it passes through.
///
/// Parts of the segment outside the grid are ignored. The working precision is
/// the precision of the segment, refined to the scale of the grid's origin and
/// cell size.
///
/// # Panics
///
/// When the walk takes more steps than a straight line can cross cells, or
/// when a step finds no exit boundary. Both mean an internal invariant broke.
pub fn rasterize<G: Grid + ?Sized>(grid: &G, segment: &Segment, factor: f64, tolerance: Dec) {
    let dims = grid.dimensions();
    if dims.rows == 0 || dims.cols == 0 {
        trace!(?segment, "grid has no cells");
        return;
    }
    let bounds = dims.envelope();
    let precision = dims.working_precision(segment.precision());
    let walked = Segment::with_precision(segment.start(), segment.end(), precision);

    if walked.is_degenerate() || !walked.envelope().intersects(&bounds) {
        trace!(?segment, "segment misses the grid");
        return;
    }
    let Some(clipped) = clip_to_envelope(&walked, &bounds, tolerance, precision) else {
        trace!(?segment, "segment misses the grid");
        return;
    };
    if clipped.start().approx_eq(&clipped.end(), tolerance) {
        trace!(?segment, "segment touches the grid in a single point");
        return;
    }

    let (dx, dy) = clipped.dir();
    let start = clipped.start();
    let Some(mut direction) = entry_direction(&start, &bounds, (dx, dy), tolerance) else {
        return;
    };
    let mut row = start_index(&dims, start.y(), dims.y_min, dy, tolerance)
        .clamp(0, dims.rows as i64 - 1);
    let mut col = start_index(&dims, start.x(), dims.x_min, dx, tolerance)
        .clamp(0, dims.cols as i64 - 1);

    let limit = dims.rows + dims.cols + 1;
    let mut steps = 0;
    let mut remaining = clipped;
    loop {
        steps += 1;
        assert!(
            steps <= limit,
            "{segment:?} crossed more than {limit} cells of a {}x{} grid",
            dims.rows,
            dims.cols
        );

        let cell = dims.cell_envelope(row, col);
        let result = step(&remaining, &cell, direction, tolerance, precision);
        let length = result.consumed.length().to_f64().unwrap_or_default();
        trace!(row, col, length, exit = ?result.exit, "cell visited");
        grid.add_to_cell(row, col, length * factor);

        let (Some(rest), Some(exit)) = (result.remainder, result.exit) else {
            break;
        };
        let (d_row, d_col) = exit.delta();
        row += d_row;
        col += d_col;
        if !grid.is_in_bounds(row, col) {
            break;
        }
        remaining = rest;
        direction = exit;
    }
    debug!(?segment, steps, "segment rasterized");
}

/// Rasterizes `segments` in parallel onto one grid.
pub fn rasterize_all<G: Grid + ?Sized>(
    grid: &G,
    segments: &[Segment],
    factor: f64,
    tolerance: Dec,
) {
    segments
        .par_iter()
        .for_each(|segment| rasterize(grid, segment, factor, tolerance));
    debug!(segments = segments.len(), "segments rasterized");
}

/// Rasterizes the segments joining consecutive `vertices`.
pub fn rasterize_polyline<G: Grid + ?Sized>(
    grid: &G,
    vertices: &[Point],
    factor: f64,
    tolerance: Dec,
) {
    for (a, b) in vertices.iter().tuple_windows() {
        rasterize(grid, &Segment::new(*a, *b), factor, tolerance);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use approx::assert_abs_diff_eq;
    use geometry::{
        intersection::{clip_to_envelope, segment_intersects_envelope},
        Dec, Envelope, Point, Precision, Rounding, Segment,
    };
    use num_traits::ToPrimitive;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        direction::Direction,
        grid::{Dimensions, Grid},
        DenseGrid,
    };

    use super::{entry_direction, rasterize, rasterize_all, rasterize_polyline, step};

    const TOLERANCE: Dec = dec!(0.000000001);

    fn seg(x1: Dec, y1: Dec, x2: Dec, y2: Dec) -> Segment {
        Segment::from_coords(x1, y1, x2, y2, Precision::default())
    }

    fn pt(x: Dec, y: Dec) -> Point {
        Point::new(x, y, Precision::default())
    }

    fn unit_grid(size: usize) -> DenseGrid {
        DenseGrid::build()
            .origin(0, 0)
            .cell_size(1)
            .rows(size)
            .cols(size)
            .build()
            .unwrap()
    }

    /// Keeps every addition in call order.
    struct Recorder {
        dimensions: Dimensions,
        cells: Mutex<Vec<(i64, i64, f64)>>,
    }

    impl Recorder {
        fn new(size: usize) -> Self {
            Self::with_dimensions(Dimensions::new(dec!(0), dec!(0), dec!(1), size, size))
        }

        fn with_dimensions(dimensions: Dimensions) -> Self {
            Self {
                dimensions,
                cells: Mutex::new(vec![]),
            }
        }

        fn visited(&self) -> Vec<(i64, i64, f64)> {
            self.cells.lock().unwrap().clone()
        }
    }

    impl Grid for Recorder {
        fn dimensions(&self) -> Dimensions {
            self.dimensions
        }

        fn add_to_cell(&self, row: i64, col: i64, value: f64) {
            assert!(self.is_in_bounds(row, col));
            self.cells.lock().unwrap().push((row, col, value));
        }
    }

    #[test]
    fn horizontal_segment_across_three_cells() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(0.5), dec!(0.5), dec!(2.5), dec!(0.5)), 1.0, TOLERANCE);
        assert_abs_diff_eq!(grid.value(0, 0).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.value(0, 1).unwrap(), 1.0);
        assert_abs_diff_eq!(grid.value(0, 2).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.total(), 2.0);
    }

    #[test]
    fn factor_scales_contributions() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(2.5), dec!(0.5), dec!(0.5), dec!(0.5)), 3.0, TOLERANCE);
        assert_abs_diff_eq!(grid.value(0, 0).unwrap(), 1.5);
        assert_abs_diff_eq!(grid.value(0, 1).unwrap(), 3.0);
        assert_abs_diff_eq!(grid.value(0, 2).unwrap(), 1.5);
    }

    #[test]
    fn zero_length_segment_adds_nothing() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(1.5), dec!(1.5), dec!(1.5), dec!(1.5)), 1.0, TOLERANCE);
        assert!(grid.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn segments_outside_or_touching_a_corner_add_nothing() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(4), dec!(0), dec!(5), dec!(3)), 1.0, TOLERANCE);
        rasterize(&grid, &seg(dec!(3), dec!(3), dec!(4), dec!(4)), 1.0, TOLERANCE);
        rasterize(&grid, &seg(dec!(-1), dec!(1), dec!(1), dec!(-1)), 1.0, TOLERANCE);
        assert_eq!(grid.total(), 0.0);
    }

    #[test]
    fn segment_crossing_the_whole_grid_is_clipped() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(-1), dec!(1.5), dec!(4), dec!(1.5)), 1.0, TOLERANCE);
        for col in 0..3 {
            assert_abs_diff_eq!(grid.value(1, col).unwrap(), 1.0);
        }
        assert_abs_diff_eq!(grid.total(), 3.0);
    }

    #[test]
    fn segment_on_an_inner_grid_line_is_credited_once() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(0.5), dec!(1), dec!(2.5), dec!(1)), 1.0, TOLERANCE);
        assert_abs_diff_eq!(grid.value(1, 0).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.value(1, 1).unwrap(), 1.0);
        assert_abs_diff_eq!(grid.value(1, 2).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.total(), 2.0);

        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(2), dec!(2.5), dec!(2), dec!(0.5)), 1.0, TOLERANCE);
        assert_abs_diff_eq!(grid.value(2, 2).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.value(1, 2).unwrap(), 1.0);
        assert_abs_diff_eq!(grid.value(0, 2).unwrap(), 0.5);
        assert_abs_diff_eq!(grid.total(), 2.0);
    }

    #[test]
    fn segments_on_the_outer_boundary_stay_inside() {
        let grid = unit_grid(3);
        rasterize(&grid, &seg(dec!(0), dec!(3), dec!(3), dec!(3)), 1.0, TOLERANCE);
        rasterize(&grid, &seg(dec!(3), dec!(0), dec!(3), dec!(3)), 1.0, TOLERANCE);
        rasterize(&grid, &seg(dec!(3), dec!(0), dec!(0), dec!(0)), 1.0, TOLERANCE);
        rasterize(&grid, &seg(dec!(0), dec!(3), dec!(0), dec!(0)), 1.0, TOLERANCE);
        for i in 0..3 {
            assert_abs_diff_eq!(grid.value(2, i).unwrap(), if i == 1 { 1.0 } else { 2.0 });
            assert_abs_diff_eq!(grid.value(0, i).unwrap(), if i == 1 { 1.0 } else { 2.0 });
        }
        assert_abs_diff_eq!(grid.value(1, 0).unwrap(), 1.0);
        assert_abs_diff_eq!(grid.value(1, 1).unwrap(), 0.0);
        assert_abs_diff_eq!(grid.value(1, 2).unwrap(), 1.0);
        assert_abs_diff_eq!(grid.total(), 12.0);
    }

    #[test]
    fn long_diagonal_through_corners_stays_within_step_bound() {
        let sqrt_2 = std::f64::consts::SQRT_2;
        let cases = [
            (seg(dec!(0), dec!(0), dec!(50), dec!(50)), false),
            (seg(dec!(50), dec!(50), dec!(0), dec!(0)), false),
            (seg(dec!(0), dec!(50), dec!(50), dec!(0)), true),
        ];
        for (segment, anti) in cases {
            let grid = Recorder::new(50);
            rasterize(&grid, &segment, 1.0, TOLERANCE);
            let visited = grid.visited();
            assert_eq!(visited.len(), 50, "{segment:?}");
            for (row, col, length) in visited {
                let expected_row = if anti { 49 - col } else { col };
                assert_eq!(row, expected_row, "{segment:?}");
                assert_abs_diff_eq!(length, sqrt_2, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn shallow_diagonal_visits_a_staircase() {
        let grid = Recorder::new(4);
        rasterize(&grid, &seg(dec!(0), dec!(0.25), dec!(4), dec!(2.25)), 1.0, TOLERANCE);
        let cells = grid.visited().iter().map(|(r, c, _)| (*r, *c)).collect::<Vec<_>>();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 1), (1, 2), (1, 3), (2, 3)]);
        let total: f64 = grid.visited().iter().map(|(_, _, v)| v).sum();
        assert_abs_diff_eq!(total, 20f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn coarse_segment_on_fine_cells() {
        let grid = DenseGrid::build()
            .origin(0, 0)
            .cell_size(dec!(0.125))
            .rows(1)
            .cols(8)
            .build()
            .unwrap();
        let precision = Precision::new(2, Rounding::HalfEven).unwrap();
        let segment =
            Segment::from_coords(dec!(0.05), dec!(0.05), dec!(0.95), dec!(0.05), precision);
        rasterize(&grid, &segment, 1.0, TOLERANCE);

        assert_abs_diff_eq!(grid.value(0, 0).unwrap(), 0.075, epsilon = 1e-12);
        for col in 1..7 {
            assert_abs_diff_eq!(grid.value(0, col).unwrap(), 0.125, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(grid.value(0, 7).unwrap(), 0.075, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.total(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn diagonal_through_millimetre_cells() {
        let grid = DenseGrid::build()
            .origin(0, 0)
            .cell_size(dec!(0.001))
            .rows(10)
            .cols(10)
            .build()
            .unwrap();
        let segment = seg(dec!(0.00013), dec!(0.00017), dec!(0.00937), dec!(0.00841));
        rasterize(&grid, &segment, 1.0, TOLERANCE);

        let length = segment.length().to_f64().unwrap();
        assert_abs_diff_eq!(grid.total(), length, epsilon = 1e-8);
        // one start cell, nine column lines and eight row lines crossed
        let visited = grid.values().iter().filter(|v| **v > 0.0).count();
        assert_eq!(visited, 18);
        let diagonal = 0.001 * std::f64::consts::SQRT_2;
        assert!(grid.values().iter().all(|v| *v <= diagonal + 1e-9));
    }

    #[test]
    fn grid_without_cells_adds_nothing() {
        let empty = [
            Dimensions::new(dec!(0), dec!(0), dec!(1), 0, 3),
            Dimensions::new(dec!(0), dec!(0), dec!(1), 3, 0),
        ];
        for dimensions in empty {
            let grid = Recorder::with_dimensions(dimensions);
            rasterize(&grid, &seg(dec!(-1), dec!(0), dec!(4), dec!(0)), 1.0, TOLERANCE);
            rasterize(&grid, &seg(dec!(0), dec!(-1), dec!(0), dec!(4)), 1.0, TOLERANCE);
            assert!(grid.visited().is_empty());
        }
    }

    #[test]
    fn walks_enter_away_from_the_boundary_they_start_on() {
        let bounds = Envelope::from_bounds(dec!(0), dec!(3), dec!(0), dec!(3));
        let cases = [
            (pt(dec!(0), dec!(1.5)), (dec!(1), dec!(1)), Direction::E),
            (pt(dec!(1.5), dec!(3)), (dec!(-1), dec!(-2)), Direction::S),
            (pt(dec!(3), dec!(0)), (dec!(-1), dec!(0)), Direction::NW),
            (pt(dec!(0), dec!(3)), (dec!(0), dec!(-1)), Direction::SE),
            (pt(dec!(1.5), dec!(1.5)), (dec!(-1), dec!(2)), Direction::NW),
            (pt(dec!(1.5), dec!(1.5)), (dec!(0), dec!(-2)), Direction::S),
        ];
        for (start, travel, expected) in cases {
            assert_eq!(
                entry_direction(&start, &bounds, travel, TOLERANCE),
                Some(expected),
                "{start:?}"
            );
        }
        assert_eq!(
            entry_direction(&pt(dec!(1), dec!(1)), &bounds, (dec!(0), dec!(0)), TOLERANCE),
            None
        );
    }

    #[test]
    fn polyline_and_parallel_batches() {
        let grid = unit_grid(4);
        let vertices = [
            pt(dec!(0.5), dec!(0.5)),
            pt(dec!(3.5), dec!(0.5)),
            pt(dec!(3.5), dec!(3.5)),
        ];
        rasterize_polyline(&grid, &vertices, 1.0, TOLERANCE);
        assert_abs_diff_eq!(grid.total(), 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grid.value(0, 3).unwrap(), 1.0);

        let grid = unit_grid(4);
        let segments = (0..4)
            .map(|row| {
                let y = Decimal::from(row) + dec!(0.5);
                seg(dec!(0), y, dec!(4), y)
            })
            .collect::<Vec<_>>();
        rasterize_all(&grid, &segments, 0.5, TOLERANCE);
        assert!(grid.values().iter().all(|v| (*v - 0.5).abs() < 1e-12));
    }

    #[test]
    fn step_splits_at_the_exit_edge() {
        let precision = Precision::default();
        let cell = Envelope::from_bounds(dec!(0), dec!(1), dec!(0), dec!(1));

        let through = seg(dec!(0.5), dec!(0.5), dec!(2), dec!(0.5));
        let result = step(&through, &cell, Direction::E, TOLERANCE, precision);
        assert_eq!(result.consumed, seg(dec!(0.5), dec!(0.5), dec!(1), dec!(0.5)));
        assert_eq!(result.remainder, Some(seg(dec!(1), dec!(0.5), dec!(2), dec!(0.5))));
        assert_eq!(result.exit, Some(Direction::E));

        let corner = seg(dec!(0.5), dec!(0.5), dec!(1.5), dec!(1.5));
        let result = step(&corner, &cell, Direction::NE, TOLERANCE, precision);
        assert_eq!(result.exit, Some(Direction::NE));
        assert_eq!(result.consumed.end(), pt(dec!(1), dec!(1)));

        let inside = seg(dec!(0.2), dec!(0.2), dec!(0.7), dec!(0.9));
        let result = step(&inside, &cell, Direction::NE, TOLERANCE, precision);
        assert_eq!(result.consumed, inside);
        assert_eq!(result.remainder, None);
        assert_eq!(result.exit, None);

        let ends_on_edge = seg(dec!(0.2), dec!(0.2), dec!(0.2), dec!(1));
        let result = step(&ends_on_edge, &cell, Direction::N, TOLERANCE, precision);
        assert_eq!(result.remainder, None);
    }

    #[test]
    fn step_along_an_edge_leaves_through_the_far_side() {
        let precision = Precision::default();
        let cell = Envelope::from_bounds(dec!(0), dec!(1), dec!(0), dec!(1));
        let along_left = seg(dec!(0), dec!(0), dec!(0), dec!(3));
        let result = step(&along_left, &cell, Direction::N, TOLERANCE, precision);
        assert_eq!(result.consumed, seg(dec!(0), dec!(0), dec!(0), dec!(1)));
        assert_eq!(result.exit, Some(Direction::N));

        let short = seg(dec!(0), dec!(0.2), dec!(0), dec!(0.6));
        let result = step(&short, &cell, Direction::N, TOLERANCE, precision);
        assert_eq!(result.consumed, short);
        assert_eq!(result.exit, None);
    }

    #[test]
    #[should_panic(expected = "no exit boundary")]
    fn step_against_the_direction_of_travel_panics() {
        let cell = Envelope::from_bounds(dec!(0), dec!(1), dec!(0), dec!(1));
        let entering = seg(dec!(-0.5), dec!(0.5), dec!(0.5), dec!(0.5));
        step(&entering, &cell, Direction::W, TOLERANCE, Precision::default());
    }

    #[test]
    #[should_panic(expected = "no exit boundary")]
    fn step_past_an_untested_edge_panics() {
        let cell = Envelope::from_bounds(dec!(0), dec!(1), dec!(0), dec!(1));
        let leaving_east = seg(dec!(0.5), dec!(0.5), dec!(2), dec!(0.5));
        step(&leaving_east, &cell, Direction::W, TOLERANCE, Precision::default());
    }

    fn coord() -> impl Strategy<Value = Dec> {
        (-20i64..120).prop_map(|v| Decimal::new(v, 1))
    }

    proptest! {
        #[test]
        fn length_is_conserved_and_lands_on_crossed_cells(
            x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord(),
        ) {
            let precision = Precision::default();
            let grid = unit_grid(10);
            let segment = seg(x1, y1, x2, y2);
            rasterize(&grid, &segment, 1.0, TOLERANCE);

            let bounds = grid.dimensions().envelope();
            let clipped = clip_to_envelope(&segment, &bounds, TOLERANCE, precision);
            let expected = clipped
                .map(|c| c.length().to_f64().unwrap())
                .unwrap_or_default();
            prop_assert!(
                (grid.total() - expected).abs() < 1e-6,
                "{} vs {}",
                grid.total(),
                expected
            );

            if let Some(clipped) = clipped {
                let dims = grid.dimensions();
                for row in 0..10 {
                    for col in 0..10 {
                        if grid.value(row, col).unwrap() > 0.0 {
                            let cell = dims.cell_envelope(row, col);
                            prop_assert!(segment_intersects_envelope(
                                &clipped, &cell, TOLERANCE, precision
                            ));
                        }
                    }
                }
            }
        }

        #[test]
        fn length_is_conserved_on_any_grid(
            size in prop::sample::select(vec![
                dec!(0.001), dec!(0.125), dec!(0.5), dec!(1), dec!(2.5), dec!(10),
            ]),
            origin_x in -500i64..500,
            origin_y in -500i64..500,
            scale in 2u32..=10,
            factor in 0.5f64..3.0,
            ends in prop::array::uniform4(-20i64..120),
        ) {
            let origin = (Decimal::new(origin_x, 1), Decimal::new(origin_y, 1));
            let dims = Dimensions::new(origin.0, origin.1, size, 10, 10);
            let given = Precision::new(scale, Rounding::HalfEven).unwrap();
            let precision = dims.working_precision(given);
            let ulp = Decimal::new(1, precision.scale());
            prop_assume!(size >= ulp * dec!(100));
            let tolerance = ulp * dec!(2);

            let at = |origin: Dec, k: i64| origin + size * Decimal::new(k, 1);
            let segment = Segment::from_coords(
                at(dims.x_min, ends[0]),
                at(dims.y_min, ends[1]),
                at(dims.x_min, ends[2]),
                at(dims.y_min, ends[3]),
                given,
            );
            let grid = Recorder::with_dimensions(dims);
            rasterize(&grid, &segment, factor, tolerance);

            let bounds = dims.envelope();
            let walked = Segment::with_precision(segment.start(), segment.end(), precision);
            let clipped = clip_to_envelope(&walked, &bounds, tolerance, precision)
                .filter(|_| walked.envelope().intersects(&bounds))
                .filter(|c| !c.start().approx_eq(&c.end(), tolerance));
            let expected = clipped
                .map(|c| c.length().to_f64().unwrap())
                .unwrap_or_default();

            let visited = grid.visited();
            let ulp = ulp.to_f64().unwrap();
            let total: f64 = visited.iter().map(|(_, _, v)| v).sum();
            prop_assert!(
                (total - expected * factor).abs() <= (200.0 * ulp + 1e-9) * factor,
                "{} vs {}", total, expected * factor
            );

            let diagonal = size.to_f64().unwrap() * std::f64::consts::SQRT_2;
            let cell_bound = (diagonal + 8.0 * ulp) * factor;
            for (row, col, value) in visited {
                prop_assert!(value <= cell_bound, "{}:{} got {}", row, col, value);
                if let Some(clipped) = clipped.filter(|_| value > 0.0) {
                    let cell = dims.cell_envelope(row, col).expand_by(tolerance * dec!(2));
                    prop_assert!(segment_intersects_envelope(
                        &clipped, &cell, tolerance, precision
                    ));
                }
            }
        }
    }
}
