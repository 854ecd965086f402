use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use itertools::Itertools;
use raster::{DenseGrid, Grid};

pub const NODATA_VALUE: i32 = -9999;

/// Writes `grid` as an ESRI ASCII grid, top row first.
pub fn write_ascii_grid<W: Write>(writer: &mut W, grid: &DenseGrid) -> io::Result<()> {
    let dims = grid.dimensions();
    writeln!(writer, "ncols {}", dims.cols)?;
    writeln!(writer, "nrows {}", dims.rows)?;
    writeln!(writer, "xllcorner {}", dims.x_min.normalize())?;
    writeln!(writer, "yllcorner {}", dims.y_min.normalize())?;
    writeln!(writer, "cellsize {}", dims.cell_size().normalize())?;
    writeln!(writer, "NODATA_value {NODATA_VALUE}")?;

    let values = grid.values();
    for row in values.chunks(dims.cols).rev() {
        writeln!(writer, "{}", row.iter().join(" "))?;
    }
    Ok(())
}

pub fn save(path: &Path, grid: &DenseGrid) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_ascii_grid(&mut writer, grid)
        .and_then(|()| writer.flush())
        .with_context(|| format!("cannot write grid to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use raster::{DenseGrid, Grid};
    use rust_decimal_macros::dec;

    use super::write_ascii_grid;

    #[test]
    fn rows_are_written_from_the_top() {
        let grid = DenseGrid::build()
            .origin(dec!(100.50), dec!(-2))
            .cell_size(dec!(0.5))
            .rows(2)
            .cols(3)
            .build()
            .unwrap();
        grid.add_to_cell(0, 0, 1.5);
        grid.add_to_cell(1, 2, 0.25);

        let mut out = Vec::new();
        write_ascii_grid(&mut out, &grid).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ncols 3\n\
             nrows 2\n\
             xllcorner 100.5\n\
             yllcorner -2\n\
             cellsize 0.5\n\
             NODATA_value -9999\n\
             0 0 0.25\n\
             1.5 0 0\n"
        );
    }
}
