use std::{fs, path::Path};

use anyhow::{ensure, Context};
use geometry::{Dec, Point, Precision, Segment};
use itertools::Itertools;

/// Reads the polylines of a line file, see [`parse_polylines`].
pub fn read_polylines(path: &Path, precision: Precision) -> anyhow::Result<Vec<Vec<Point>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read lines from {}", path.display()))?;
    parse_polylines(&text, precision).with_context(|| format!("in {}", path.display()))
}

/// One polyline per row given as whitespace or comma separated coordinate
/// pairs. Blank rows and everything after `#` are ignored.
pub fn parse_polylines(text: &str, precision: Precision) -> anyhow::Result<Vec<Vec<Point>>> {
    text.lines()
        .enumerate()
        .filter_map(|(index, row)| {
            let row = row.split('#').next().unwrap_or_default().trim();
            (!row.is_empty()).then_some((index + 1, row))
        })
        .map(|(number, row)| {
            parse_polyline(row, precision).with_context(|| format!("line {number}: `{row}`"))
        })
        .collect()
}

fn parse_polyline(row: &str, precision: Precision) -> anyhow::Result<Vec<Point>> {
    let values = row
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<Dec>()
                .with_context(|| format!("`{token}` is not a decimal number"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    ensure!(
        values.len() >= 4 && values.len() % 2 == 0,
        "expected pairs of coordinates for at least two points, got {} values",
        values.len()
    );
    Ok(values
        .into_iter()
        .tuples()
        .map(|(x, y)| Point::new(x, y, precision))
        .collect())
}

/// Segments joining consecutive vertices of every polyline.
pub fn segments(polylines: &[Vec<Point>]) -> Vec<Segment> {
    polylines
        .iter()
        .flat_map(|vertices| {
            vertices
                .iter()
                .tuple_windows()
                .map(|(a, b)| Segment::new(*a, *b))
        })
        .collect()
}
