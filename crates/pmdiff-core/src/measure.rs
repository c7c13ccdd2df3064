use crate::error::Result;
use crate::state::Field;

pub use crate::operator::total_variation;

/// Root-mean-square difference between two fields of the same shape.
pub fn rmse(reference: &Field, approximation: &Field) -> Result<f64> {
    approximation.ensure_shape(reference.shape())?;
    let n = reference.len();
    if n == 0 {
        return Ok(0.0);
    }
    let sum_sq = reference
        .iter()
        .zip(approximation.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>();
    Ok((sum_sq / n as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn rmse_of_constant_offset() {
        let a = Field::zeros(4, 5);
        let b = Field::from_fn(4, 5, |_, _| 0.5);
        assert_eq!(rmse(&a, &b).unwrap(), 0.5);
    }

    #[test]
    fn rmse_rejects_mismatched_shapes() {
        let err = rmse(&Field::zeros(2, 3), &Field::zeros(3, 2)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
