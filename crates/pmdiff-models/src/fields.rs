//! Synthetic test fields standing in for loaded images.

use pmdiff_core::Field;

/// `low` left of column `cols / 2`, `high` from there on.
pub fn step_edge(rows: usize, cols: usize, low: f64, high: f64) -> Field {
    Field::from_fn(rows, cols, |_, j| if j >= cols / 2 { high } else { low })
}

/// A centred disk of `radius` cells at `inside` on an `outside` background.
pub fn disk(rows: usize, cols: usize, radius: f64, inside: f64, outside: f64) -> Field {
    let (ci, cj) = ((rows as f64 - 1.0) / 2.0, (cols as f64 - 1.0) / 2.0);
    Field::from_fn(rows, cols, |i, j| {
        let (di, dj) = (i as f64 - ci, j as f64 - cj);
        if di.hypot(dj) <= radius {
            inside
        } else {
            outside
        }
    })
}

/// Linear ramp from `from` at row 0 to `to` at the last row.
pub fn ramp(rows: usize, cols: usize, from: f64, to: f64) -> Field {
    let span = (rows.max(2) - 1) as f64;
    Field::from_fn(rows, cols, |i, _| from + (to - from) * i as f64 / span)
}
