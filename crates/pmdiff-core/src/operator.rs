//! Finite-difference gradient and divergence on a unit-spaced grid.
//!
//! Interior points use second-order central differences, edge points use
//! first-order one-sided differences. Nothing wraps around. An axis of
//! length 1 has a zero derivative.

use crate::state::Field;
use nalgebra::DMatrix;

/// `∂f/∂x` along the row axis.
pub fn derivative_x(f: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = f.shape();
    let mut out = DMatrix::zeros(rows, cols);
    if rows < 2 {
        return out;
    }
    for j in 0..cols {
        out[(0, j)] = f[(1, j)] - f[(0, j)];
        for i in 1..rows - 1 {
            out[(i, j)] = 0.5 * (f[(i + 1, j)] - f[(i - 1, j)]);
        }
        out[(rows - 1, j)] = f[(rows - 1, j)] - f[(rows - 2, j)];
    }
    out
}

/// `∂f/∂y` along the column axis.
pub fn derivative_y(f: &DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = f.shape();
    let mut out = DMatrix::zeros(rows, cols);
    if cols < 2 {
        return out;
    }
    for i in 0..rows {
        out[(i, 0)] = f[(i, 1)] - f[(i, 0)];
        out[(i, cols - 1)] = f[(i, cols - 1)] - f[(i, cols - 2)];
    }
    for j in 1..cols - 1 {
        for i in 0..rows {
            out[(i, j)] = 0.5 * (f[(i, j + 1)] - f[(i, j - 1)]);
        }
    }
    out
}

/// Both partial derivatives of `field`, each with the field's shape.
pub fn gradient(field: &Field) -> (Field, Field) {
    (Field(derivative_x(field)), Field(derivative_y(field)))
}

/// Elementwise `sqrt(gx^2 + gy^2)`.
pub fn magnitude(grad_x: &Field, grad_y: &Field) -> Field {
    Field(grad_x.zip_map(&grad_y.0, |a, b| a.hypot(b)))
}

/// `∂(flux_x)/∂x`
pub fn divergence_x(flux_x: &Field) -> Field {
    Field(derivative_x(flux_x))
}

/// `∂(flux_y)/∂y`
pub fn divergence_y(flux_y: &Field) -> Field {
    Field(derivative_y(flux_y))
}

/// `∂(flux_x)/∂x + ∂(flux_y)/∂y`
pub fn divergence(flux_x: &Field, flux_y: &Field) -> Field {
    let mut div = derivative_x(flux_x);
    div += derivative_y(flux_y);
    Field(div)
}

/// Sum of gradient magnitudes over the field.
pub fn total_variation(field: &Field) -> f64 {
    let (gx, gy) = gradient(field);
    magnitude(&gx, &gy).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn gradient_of_linear_ramp_is_exact() {
        let field = Field::from_fn(5, 4, |i, j| 2.0 * i as f64 - 3.0 * j as f64);
        let (gx, gy) = gradient(&field);
        for v in gx.iter() {
            assert_abs_diff_eq!(*v, 2.0, epsilon = 1e-14);
        }
        for v in gy.iter() {
            assert_abs_diff_eq!(*v, -3.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn edges_use_one_sided_differences() {
        let field = Field::from_row_slice(1, 4, &[0.0, 1.0, 4.0, 9.0]).unwrap();
        let (gx, gy) = gradient(&field);
        assert!(gx.iter().all(|v| *v == 0.0));
        assert_eq!(gy.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn magnitude_is_euclidean() {
        let gx = Field::from_fn(2, 2, |_, _| 3.0);
        let gy = Field::from_fn(2, 2, |_, _| 4.0);
        assert!(magnitude(&gx, &gy).iter().all(|v| (*v - 5.0).abs() < 1e-15));
    }

    #[test]
    fn constant_field_has_zero_variation() {
        let field = Field::from_fn(6, 7, |_, _| 0.25);
        assert_eq!(total_variation(&field), 0.0);
        let (gx, gy) = gradient(&field);
        assert!(divergence(&gx, &gy).iter().all(|v| *v == 0.0));
    }
}
