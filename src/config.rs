use std::path::PathBuf;

use anyhow::{ensure, Context};
use geometry::{Dec, Precision};
use raster::{DenseGrid, Dimensions};

use crate::cli::Command;

/// Validated settings of a rasterization run.
#[derive(Debug, Clone)]
pub struct RasterConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dimensions: Dimensions,
    pub precision: Precision,
    pub tolerance: Dec,
    pub factor: f64,
    pub parallel: bool,
}

impl RasterConfig {
    pub fn grid(&self) -> DenseGrid {
        DenseGrid::new(self.dimensions)
    }
}

impl TryFrom<Command> for RasterConfig {
    type Error = anyhow::Error;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        let dimensions = DenseGrid::build()
            .origin(command.x_min, command.y_min)
            .cell_size(command.cell_size)
            .rows(command.rows)
            .cols(command.cols)
            .dimensions()
            .context("invalid grid")?;
        let precision =
            Precision::new(command.scale, command.rounding).context("invalid precision")?;

        ensure!(
            !command.tolerance.is_sign_negative(),
            "tolerance must not be negative, got {}",
            command.tolerance
        );
        ensure!(
            command.factor.is_finite(),
            "factor must be a finite number, got {}",
            command.factor
        );

        Ok(Self {
            input_path: command.input_path,
            output_path: command.output_path,
            dimensions,
            precision,
            tolerance: command.tolerance,
            factor: command.factor,
            parallel: !command.sequential,
        })
    }
}
