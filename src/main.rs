use clap::Parser;
use raster::{rasterize_all, rasterize_polyline, DenseGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RasterConfig;

mod cli;
mod config;
mod input;
mod output;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = RasterConfig::try_from(cli::Command::parse())?;
    let grid = run(&config)?;
    info!(
        total = grid.total(),
        output = %config.output_path.display(),
        "grid written"
    );
    Ok(())
}

fn run(config: &RasterConfig) -> anyhow::Result<DenseGrid> {
    let polylines = input::read_polylines(&config.input_path, config.precision)?;
    info!(
        polylines = polylines.len(),
        input = %config.input_path.display(),
        "lines read"
    );

    let grid = config.grid();
    if config.parallel {
        let segments = input::segments(&polylines);
        rasterize_all(&grid, &segments, config.factor, config.tolerance);
    } else {
        for vertices in &polylines {
            rasterize_polyline(&grid, vertices, config.factor, config.tolerance);
        }
    }

    output::save(&config.output_path, &grid)?;
    Ok(grid)
}
