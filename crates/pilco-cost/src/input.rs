//! Array inputs for cost evaluation.
//!
//! Targets and queries can be supplied in several forms (nalgebra matrices,
//! nested `Vec`s, fixed-size arrays, plain scalars). [`IntoArray`] turns any of
//! them into an [`NdArray`], which keeps the input's rank so that shape errors
//! can report exactly what the caller passed, e.g. `(3,)` for a flat vector
//! where a `1 x 3` row was expected.
//!
//! `NdArray` also has a serde representation (number, flat array, or array of
//! rows) used by configuration and belief files.

use nalgebra::{DMatrix, Scalar};
use num_traits::{NumCast, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cost::error::{CostError, CostResult};
use crate::dtype::Precision;

/// Dimension sizes of an array, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    pub fn scalar() -> Self {
        Shape(Vec::new())
    }

    pub fn matrix(rows: usize, cols: usize) -> Self {
        Shape(vec![rows, cols])
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (1 for a scalar).
    pub fn num_elements(&self) -> usize {
        self.0.iter().product()
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::matrix(rows, cols)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [n] => write!(f, "({},)", n),
            dims => {
                let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// A numeric array of rank 0, 1 or 2.
#[derive(Debug, Clone, PartialEq)]
pub enum NdArray<S: Scalar> {
    Scalar(S),
    Vector(Vec<S>),
    Matrix(DMatrix<S>),
}

impl<S: Scalar> NdArray<S> {
    /// Build a rank-2 array from rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<S>]) -> CostResult<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * ncols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != ncols {
                return Err(CostError::RaggedRows {
                    row,
                    expected: ncols,
                    found: values.len(),
                });
            }
            flat.extend(values.iter().cloned());
        }
        Ok(NdArray::Matrix(DMatrix::from_row_slice(rows.len(), ncols, &flat)))
    }

    pub fn shape(&self) -> Shape {
        match self {
            NdArray::Scalar(_) => Shape::scalar(),
            NdArray::Vector(v) => Shape::new(vec![v.len()]),
            NdArray::Matrix(m) => Shape::matrix(m.nrows(), m.ncols()),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            NdArray::Scalar(_) => 0,
            NdArray::Vector(_) => 1,
            NdArray::Matrix(_) => 2,
        }
    }

    /// The matrix, if this array is rank 2.
    pub fn into_matrix(self) -> Option<DMatrix<S>> {
        match self {
            NdArray::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// The single element of a one-element array of any rank.
    pub fn into_scalar(self) -> Option<S> {
        match self {
            NdArray::Scalar(v) => Some(v),
            NdArray::Vector(v) if v.len() == 1 => v.into_iter().next(),
            NdArray::Matrix(m) if m.len() == 1 => m.iter().next().cloned(),
            _ => None,
        }
    }

    /// Rows in row-major order (empty for lower ranks).
    pub fn rows(&self) -> Vec<Vec<S>> {
        match self {
            NdArray::Matrix(m) => m
                .row_iter()
                .map(|r| r.iter().cloned().collect())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl<S: Scalar + ToPrimitive> NdArray<S> {
    /// Cast every element to precision `T`.
    pub fn cast<T: Precision>(self) -> CostResult<NdArray<T>> {
        Ok(match self {
            NdArray::Scalar(v) => NdArray::Scalar(cast_value(&v)?),
            NdArray::Vector(v) => NdArray::Vector(
                v.iter().map(cast_value).collect::<CostResult<Vec<T>>>()?,
            ),
            NdArray::Matrix(m) => {
                let values = m.iter().map(cast_value).collect::<CostResult<Vec<T>>>()?;
                NdArray::Matrix(DMatrix::from_vec(m.nrows(), m.ncols(), values))
            }
        })
    }
}

/// Cast a single value to precision `T`.
///
/// Float narrowing saturates to infinity instead of failing, so the result
/// must be finite. Non-finite sources are rejected the same way.
pub(crate) fn cast_value<S, T>(value: &S) -> CostResult<T>
where
    S: Scalar + ToPrimitive,
    T: Precision,
{
    <T as NumCast>::from(value.clone())
        .filter(|v: &T| v.is_finite())
        .ok_or_else(|| CostError::Cast {
            dtype: T::DTYPE,
            value: format!("{:?}", value),
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArray<S> {
    Scalar(S),
    Vector(Vec<S>),
    Matrix(Vec<Vec<S>>),
}

impl<'de, S> Deserialize<'de> for NdArray<S>
where
    S: Scalar + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawArray::<S>::deserialize(deserializer)? {
            RawArray::Scalar(v) => Ok(NdArray::Scalar(v)),
            RawArray::Vector(v) => Ok(NdArray::Vector(v)),
            RawArray::Matrix(rows) => NdArray::from_rows(&rows).map_err(serde::de::Error::custom),
        }
    }
}

impl<S> Serialize for NdArray<S>
where
    S: Scalar + Serialize,
{
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        match self {
            NdArray::Scalar(v) => v.serialize(serializer),
            NdArray::Vector(v) => v.serialize(serializer),
            NdArray::Matrix(_) => self.rows().serialize(serializer),
        }
    }
}

/// Types convertible into an [`NdArray`].
pub trait IntoArray<S: Scalar> {
    fn into_array(self) -> CostResult<NdArray<S>>;
}

impl<S: Scalar> IntoArray<S> for NdArray<S> {
    fn into_array(self) -> CostResult<NdArray<S>> {
        Ok(self)
    }
}

impl<S: Scalar> IntoArray<S> for &NdArray<S> {
    fn into_array(self) -> CostResult<NdArray<S>> {
        Ok(self.clone())
    }
}

impl<S: Scalar> IntoArray<S> for DMatrix<S> {
    fn into_array(self) -> CostResult<NdArray<S>> {
        Ok(NdArray::Matrix(self))
    }
}

impl<S: Scalar> IntoArray<S> for &DMatrix<S> {
    fn into_array(self) -> CostResult<NdArray<S>> {
        Ok(NdArray::Matrix(self.clone()))
    }
}

impl<S: Scalar> IntoArray<S> for Vec<Vec<S>> {
    fn into_array(self) -> CostResult<NdArray<S>> {
        NdArray::from_rows(&self)
    }
}

impl<S: Scalar> IntoArray<S> for &[Vec<S>] {
    fn into_array(self) -> CostResult<NdArray<S>> {
        NdArray::from_rows(self)
    }
}

impl<S: Scalar, const R: usize, const C: usize> IntoArray<S> for [[S; C]; R] {
    fn into_array(self) -> CostResult<NdArray<S>> {
        let flat: Vec<S> = self.iter().flat_map(|row| row.iter().cloned()).collect();
        Ok(NdArray::Matrix(DMatrix::from_row_slice(R, C, &flat)))
    }
}

macro_rules! impl_low_rank_inputs {
    ($($t:ty),*) => {
        $(
            impl IntoArray<$t> for $t {
                fn into_array(self) -> CostResult<NdArray<$t>> {
                    Ok(NdArray::Scalar(self))
                }
            }

            impl IntoArray<$t> for Vec<$t> {
                fn into_array(self) -> CostResult<NdArray<$t>> {
                    Ok(NdArray::Vector(self))
                }
            }

            impl IntoArray<$t> for &[$t] {
                fn into_array(self) -> CostResult<NdArray<$t>> {
                    Ok(NdArray::Vector(self.to_vec()))
                }
            }

            impl<const N: usize> IntoArray<$t> for [$t; N] {
                fn into_array(self) -> CostResult<NdArray<$t>> {
                    Ok(NdArray::Vector(self.to_vec()))
                }
            }
        )*
    };
}

impl_low_rank_inputs!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Dtype;

    #[test]
    fn shape_display_matches_rank() {
        assert_eq!(Shape::scalar().to_string(), "()");
        assert_eq!(Shape::new(vec![3]).to_string(), "(3,)");
        assert_eq!(Shape::matrix(1, 3).to_string(), "(1, 3)");
        assert_eq!(Shape::matrix(2, 4).num_elements(), 8);
    }

    #[test]
    fn from_rows_is_row_major() {
        let arr = NdArray::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let m = arr.into_matrix().unwrap();
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = NdArray::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            CostError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn into_scalar_accepts_any_single_element() {
        assert_eq!(NdArray::Scalar(2.0).into_scalar(), Some(2.0));
        assert_eq!(NdArray::Vector(vec![2.0]).into_scalar(), Some(2.0));
        assert_eq!([[2.0]].into_array().unwrap().into_scalar(), Some(2.0));
        assert_eq!(NdArray::Vector(vec![1.0, 2.0]).into_scalar(), None);
    }

    #[test]
    fn flat_inputs_stay_rank_one() {
        let arr = vec![1.0f64, 2.0, 3.0].into_array().unwrap();
        assert_eq!(arr.rank(), 1);
        assert_eq!(arr.shape().to_string(), "(3,)");
    }

    #[test]
    fn cast_narrows_precision() {
        let arr = NdArray::Matrix(DMatrix::from_row_slice(1, 2, &[0.1f64, 0.2]));
        let narrowed = arr.cast::<f32>().unwrap().into_matrix().unwrap();
        assert_eq!(narrowed[(0, 0)], 0.1f32);
    }

    #[test]
    fn cast_rejects_values_that_overflow_single_precision() {
        let arr = NdArray::Matrix(DMatrix::from_row_slice(1, 2, &[1e300f64, 0.0]));
        let err = arr.clone().cast::<f32>().unwrap_err();
        assert!(matches!(err, CostError::Cast { dtype: Dtype::Float32, .. }));
        assert!(err.to_string().contains("float32"));

        // Still representable at double precision.
        assert!(arr.cast::<f64>().is_ok());
    }

    #[test]
    fn cast_rejects_non_finite_sources() {
        assert!(matches!(
            NdArray::Vector(vec![0.0f64, f64::NAN]).cast::<f64>(),
            Err(CostError::Cast { .. })
        ));
        assert!(matches!(
            NdArray::Scalar(f64::NEG_INFINITY).cast::<f32>(),
            Err(CostError::Cast { .. })
        ));
    }

    #[test]
    fn serde_reads_every_rank() {
        let scalar: NdArray<f64> = serde_json::from_str("0.5").unwrap();
        assert_eq!(scalar, NdArray::Scalar(0.5));

        let vector: NdArray<f64> = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(vector.shape(), Shape::new(vec![2]));

        let matrix: NdArray<f64> = serde_json::from_str("[[1.0, 2.0, 3.0]]").unwrap();
        assert_eq!(matrix.shape(), Shape::matrix(1, 3));

        let ragged: Result<NdArray<f64>, _> = serde_json::from_str("[[1.0], [2.0, 3.0]]");
        assert!(ragged.is_err());
    }

    #[test]
    fn serde_writes_rows() {
        let arr = NdArray::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&arr).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");
    }
}
