mod dense_grid;
mod direction;
mod grid;
mod grid_builder;
mod traversal;

pub use dense_grid::DenseGrid;
pub use direction::{Direction, Edge};
pub use grid::{Dimensions, Grid, GridError};
pub use grid_builder::GridBuilder;
pub use traversal::{rasterize, rasterize_all, rasterize_polyline, step, StepResult};
