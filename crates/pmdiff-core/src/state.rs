use crate::error::{Error, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

pub type Time = f64;

/// A 2-D scalar field (image intensity, concentration, ...) on a unit-spaced grid.
///
/// Rows are the "x" axis and columns the "y" axis of the finite-difference
/// operator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field(pub DMatrix<f64>);

impl Field {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Field(DMatrix::zeros(rows, cols))
    }

    pub fn from_fn(rows: usize, cols: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        Field(DMatrix::from_fn(rows, cols, f))
    }

    /// Builds a field from row-major values.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                found: (values.len(), 1),
            });
        }
        Ok(Field(DMatrix::from_row_slice(rows, cols, values)))
    }

    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    pub fn ensure_shape(&self, expected: (usize, usize)) -> Result<()> {
        let found = self.shape();
        if found != expected {
            return Err(Error::ShapeMismatch { expected, found });
        }
        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.0.min()
    }

    pub fn max(&self) -> f64 {
        self.0.max()
    }
}

impl std::ops::Deref for Field {
    type Target = DMatrix<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Field {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<DMatrix<f64>> for Field {
    fn from(m: DMatrix<f64>) -> Self {
        Field(m)
    }
}

/// Append-only sequence of accepted fields, one per completed time step.
///
/// Entry 0 is the initial field. Every entry has the same shape; pushing a
/// field of another shape is rejected.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldHistory {
    fields: Vec<Field>,
}

impl FieldHistory {
    pub fn new(initial: Field) -> Self {
        Self { fields: vec![initial] }
    }

    pub fn with_capacity(initial: Field, capacity: usize) -> Self {
        let mut fields = Vec::with_capacity(capacity.max(1));
        fields.push(initial);
        Self { fields }
    }

    pub fn push(&mut self, field: Field) -> Result<()> {
        if let Some(first) = self.fields.first() {
            field.ensure_shape(first.shape())?;
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn initial(&self) -> Option<&Field> {
        self.fields.first()
    }

    pub fn latest(&self) -> Option<&Field> {
        self.fields.last()
    }

    /// The field `back` steps before the latest one (`back = 0` is the latest).
    pub fn back(&self, back: usize) -> Option<&Field> {
        self.fields.len().checked_sub(back + 1).map(|i| &self.fields[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

impl std::ops::Index<usize> for FieldHistory {
    type Output = Field;

    fn index(&self, i: usize) -> &Field {
        &self.fields[i]
    }
}
