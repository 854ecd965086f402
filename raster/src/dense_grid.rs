use std::sync::{Mutex, PoisonError};

use crate::{
    grid::{Dimensions, Grid},
    GridBuilder,
};

/// Grid storing every cell in memory. Accumulation is guarded by a lock, so a
/// single grid can be shared by concurrent rasterizations.
#[derive(Debug)]
pub struct DenseGrid {
    dimensions: Dimensions,
    cells: Mutex<Vec<f64>>,
}

impl DenseGrid {
    pub fn build() -> GridBuilder {
        GridBuilder::default()
    }

    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            cells: Mutex::new(vec![0.0; dimensions.rows * dimensions.cols]),
            dimensions,
        }
    }

    pub fn rows(&self) -> usize {
        self.dimensions.rows
    }

    pub fn cols(&self) -> usize {
        self.dimensions.cols
    }

    fn offset(&self, row: i64, col: i64) -> Option<usize> {
        self.is_in_bounds(row, col)
            .then(|| row as usize * self.dimensions.cols + col as usize)
    }

    /// Accumulated value, `None` outside the grid.
    pub fn value(&self, row: i64, col: i64) -> Option<f64> {
        let offset = self.offset(row, col)?;
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Some(cells[offset])
    }

    pub fn total(&self) -> f64 {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.iter().sum()
    }

    /// Copy of all cells, row major, starting with the bottom row.
    pub fn values(&self) -> Vec<f64> {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset(&self) {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.iter_mut().for_each(|v| *v = 0.0);
    }
}

impl Grid for DenseGrid {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn add_to_cell(&self, row: i64, col: i64, value: f64) {
        let offset = self
            .offset(row, col)
            .unwrap_or_else(|| panic!("cell {row}:{col} is outside the grid"));
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells[offset] += value;
    }
}
