use geometry::Dec;
use num_traits::Zero;

use crate::{
    grid::{Dimensions, GridError},
    DenseGrid,
};

#[derive(Default)]
pub struct GridBuilder {
    x_min: Option<Dec>,
    y_min: Option<Dec>,
    cell_size: Option<Dec>,
    rows: Option<usize>,
    cols: Option<usize>,
}

impl GridBuilder {
    /// Lower left corner of the grid.
    pub fn origin(mut self, x_min: impl Into<Dec>, y_min: impl Into<Dec>) -> Self {
        self.x_min = Some(x_min.into());
        self.y_min = Some(y_min.into());
        self
    }

    pub fn cell_size(mut self, cell_size: impl Into<Dec>) -> Self {
        self.cell_size = Some(cell_size.into());
        self
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn dimensions(self) -> Result<Dimensions, GridError> {
        let x_min = self.x_min.ok_or(GridError::Missing("origin"))?;
        let y_min = self.y_min.ok_or(GridError::Missing("origin"))?;
        let cell_size = self.cell_size.ok_or(GridError::Missing("cell size"))?;
        let rows = self.rows.ok_or(GridError::Missing("row count"))?;
        let cols = self.cols.ok_or(GridError::Missing("column count"))?;

        if cell_size <= Dec::zero() {
            return Err(GridError::NonPositiveCellSize(cell_size));
        }
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty { rows, cols });
        }
        Ok(Dimensions::new(x_min, y_min, cell_size, rows, cols))
    }

    pub fn build(self) -> Result<DenseGrid, GridError> {
        Ok(DenseGrid::new(self.dimensions()?))
    }
}
