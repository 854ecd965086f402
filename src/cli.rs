use std::path::PathBuf;

use clap::Parser;
use geometry::{Dec, Rounding};

/// Accumulates the length of lines falling into every cell of a regular grid.
#[derive(Parser, Debug)]
#[command(name = "transect-raster")]
pub struct Command {
    /// One line or polyline per row: `x1 y1 x2 y2 [x3 y3 ...]`, `#` starts a
    /// comment
    #[arg(long)]
    pub input_path: PathBuf,

    /// ESRI ASCII grid written here
    #[arg(long)]
    pub output_path: PathBuf,

    /// Left edge of the grid
    #[arg(long, allow_negative_numbers = true)]
    pub x_min: Dec,

    /// Bottom edge of the grid
    #[arg(long, allow_negative_numbers = true)]
    pub y_min: Dec,

    #[arg(long)]
    pub cell_size: Dec,

    #[arg(long)]
    pub rows: usize,

    #[arg(long)]
    pub cols: usize,

    /// Fractional digits kept by every computation
    #[arg(long, default_value_t = 10)]
    pub scale: u32,

    #[arg(long, default_value_t = Rounding::HalfEven)]
    pub rounding: Rounding,

    /// Values closer than this are treated as equal
    #[arg(long, default_value = "0.000000001")]
    pub tolerance: Dec,

    /// Multiplier applied to every accumulated length
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub factor: f64,

    /// Rasterize one line after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}
