use geometry::{approx_eq, Dec, Envelope, Precision};
use num_traits::ToPrimitive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell size must be positive, got {0}")]
    NonPositiveCellSize(Dec),
    #[error("grid needs at least one row and one column, got {rows} x {cols}")]
    Empty { rows: usize, cols: usize },
    #[error("grid {0} is not specified")]
    Missing(&'static str),
}

/// Extent of a regular grid of square cells. Row `0` is the bottom row and
/// column `0` the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub x_min: Dec,
    pub y_min: Dec,
    pub x_max: Dec,
    pub y_max: Dec,
    pub half_cell_size: Dec,
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn new(x_min: Dec, y_min: Dec, cell_size: Dec, rows: usize, cols: usize) -> Self {
        Self {
            x_min,
            y_min,
            x_max: x_min + cell_size * Dec::from(cols),
            y_max: y_min + cell_size * Dec::from(rows),
            half_cell_size: cell_size / Dec::TWO,
            rows,
            cols,
        }
    }

    pub fn cell_size(&self) -> Dec {
        self.half_cell_size * Dec::TWO
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_bounds(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    pub fn cell_envelope(&self, row: i64, col: i64) -> Envelope {
        let size = self.cell_size();
        let x = self.x_min + size * Dec::from(col);
        let y = self.y_min + size * Dec::from(row);
        Envelope::from_bounds(x, x + size, y, y + size)
    }

    /// `precision`, refined until the origin and every grid line are exact.
    pub fn working_precision(&self, precision: Precision) -> Precision {
        let scale = [self.x_min, self.y_min, self.cell_size()]
            .iter()
            .map(|value| value.normalize().scale())
            .max()
            .unwrap_or_default();
        Precision::new(scale, precision.rounding())
            .map_or(precision, |grid| precision.finer(grid))
    }

    /// Index of the cell band containing `value`, counted from `origin`.
    pub(crate) fn band(&self, value: Dec, origin: Dec) -> i64 {
        saturate(((value - origin) / self.cell_size()).floor())
    }

    /// Index of the grid line lying within `tolerance` of `value`, if any.
    pub(crate) fn line_near(&self, value: Dec, origin: Dec, tolerance: Dec) -> Option<i64> {
        let size = self.cell_size();
        let line = ((value - origin) / size).round();
        approx_eq(value, origin + line * size, tolerance).then(|| saturate(line))
    }
}

fn saturate(index: Dec) -> i64 {
    index.to_i64().unwrap_or(if index.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Regular grid accumulating a value per cell.
///
/// `add_to_cell` takes `&self`: implementations shared between threads must
/// make accumulation safe for concurrent callers.
pub trait Grid: Sync {
    fn dimensions(&self) -> Dimensions;

    fn row_of(&self, y: Dec) -> i64 {
        let dims = self.dimensions();
        dims.band(y, dims.y_min)
    }

    fn col_of(&self, x: Dec) -> i64 {
        let dims = self.dimensions();
        dims.band(x, dims.x_min)
    }

    fn is_in_bounds(&self, row: i64, col: i64) -> bool {
        let dims = self.dimensions();
        (0..dims.rows as i64).contains(&row) && (0..dims.cols as i64).contains(&col)
    }

    fn add_to_cell(&self, row: i64, col: i64, value: f64);
}
