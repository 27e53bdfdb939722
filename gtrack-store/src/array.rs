use gtrack_core::{GtrackError, Result};

use crate::dtype::DType;

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Utf8(Vec<String>),
}

impl ArrayValues {
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Int64(v) => v.len(),
            ArrayValues::Float64(v) => v.len(),
            ArrayValues::Utf8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            ArrayValues::Int64(_) => DType::Int64,
            ArrayValues::Float64(_) => DType::Float64,
            ArrayValues::Utf8(_) => DType::Utf8,
        }
    }
}

///
/// A materialized, row-major slice of a stored array.
///
/// Plain columns have a width of one; edge ids and edge weights are stored as
/// rows of `width` items each.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    width: usize,
    values: ArrayValues,
}

impl Array {
    pub fn new(values: ArrayValues, width: usize) -> Result<Self> {
        if width == 0 || values.len() % width != 0 {
            return Err(GtrackError::CorruptStore(format!(
                "{} items can't be split into rows of width {}",
                values.len(),
                width
            )));
        }
        Ok(Array { width, values })
    }

    pub fn from_i64(values: Vec<i64>) -> Self {
        Array {
            width: 1,
            values: ArrayValues::Int64(values),
        }
    }

    pub fn from_f64(values: Vec<f64>) -> Self {
        Array {
            width: 1,
            values: ArrayValues::Float64(values),
        }
    }

    pub fn from_strings(values: Vec<String>) -> Self {
        Array {
            width: 1,
            values: ArrayValues::Utf8(values),
        }
    }

    pub fn rows(&self) -> usize {
        self.values.len() / self.width
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    pub fn values(&self) -> &ArrayValues {
        &self.values
    }

    pub fn into_values(self) -> ArrayValues {
        self.values
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.values {
            ArrayValues::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.values {
            ArrayValues::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.values {
            ArrayValues::Utf8(v) => Some(v),
            _ => None,
        }
    }

    ///
    /// Copy the rows `[start, end)` taking every `step`th row. Indices are
    /// relative to this array.
    ///
    pub fn slice_rows(&self, start: usize, end: usize, step: usize) -> Array {
        let end = end.min(self.rows());
        let start = start.min(end);
        let step = step.max(1);
        let width = self.width;

        fn pick<T: Clone>(items: &[T], start: usize, end: usize, step: usize, width: usize) -> Vec<T> {
            (start..end)
                .step_by(step)
                .flat_map(|row| items[row * width..(row + 1) * width].iter().cloned())
                .collect()
        }

        let values = match &self.values {
            ArrayValues::Int64(v) => ArrayValues::Int64(pick(v, start, end, step, width)),
            ArrayValues::Float64(v) => ArrayValues::Float64(pick(v, start, end, step, width)),
            ArrayValues::Utf8(v) => ArrayValues::Utf8(pick(v, start, end, step, width)),
        };

        Array { width, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_new_rejects_ragged_rows() {
        let result = Array::new(ArrayValues::Float64(vec![1.0, 2.0, 3.0]), 2);
        assert!(matches!(result, Err(GtrackError::CorruptStore(_))));
    }

    #[rstest]
    #[case(0, 5, 1, vec![10, 11, 12, 13, 14])]
    #[case(1, 4, 1, vec![11, 12, 13])]
    #[case(0, 5, 2, vec![10, 12, 14])]
    #[case(3, 3, 1, vec![])]
    #[case(2, 99, 1, vec![12, 13, 14])]
    fn test_slice_rows(
        #[case] start: usize,
        #[case] end: usize,
        #[case] step: usize,
        #[case] expected: Vec<i64>,
    ) {
        let array = Array::from_i64(vec![10, 11, 12, 13, 14]);
        let sliced = array.slice_rows(start, end, step);
        assert_eq!(sliced.as_i64().unwrap(), expected.as_slice());
    }

    #[rstest]
    fn test_slice_rows_keeps_width() {
        let array = Array::new(
            ArrayValues::Utf8(
                ["a", "b", "c", "d", "e", "f"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            2,
        )
        .unwrap();

        let sliced = array.slice_rows(1, 3, 1);
        assert_eq!(sliced.rows(), 2);
        assert_eq!(sliced.width(), 2);
        assert_eq!(sliced.as_strings().unwrap(), &["c", "d", "e", "f"]);
    }
}
