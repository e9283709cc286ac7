//! Dense matrix and vector containers
//!
//! Thin wrappers over nalgebra's `DMatrix<f64>` / `DVector<f64>` that check
//! shapes when they are built and combined. Element access goes straight to
//! the backing storage: indexing out of range is a programmer error and
//! panics.

use std::ops::{Index, IndexMut};

use nalgebra::{DMatrix, DVector};

use crate::error::{FrameError, FrameResult};

fn check_dimension(what: &str, n: usize) -> FrameResult<()> {
    if n == 0 {
        return Err(FrameError::Configuration(format!(
            "{} must have a positive dimension",
            what
        )));
    }
    Ok(())
}

fn shape_mismatch(op: &str, lhs: (usize, usize), rhs: (usize, usize)) -> FrameError {
    FrameError::Configuration(format!(
        "shape mismatch in {}: {}x{} vs {}x{}",
        op, lhs.0, lhs.1, rhs.0, rhs.1
    ))
}

/// Dense, row/column addressable matrix
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixDense {
    data: DMatrix<f64>,
}

impl MatrixDense {
    /// Create a zero matrix
    pub fn zeros(nrows: usize, ncols: usize) -> FrameResult<Self> {
        check_dimension("matrix row count", nrows)?;
        check_dimension("matrix column count", ncols)?;
        Ok(Self {
            data: DMatrix::zeros(nrows, ncols),
        })
    }

    /// Create an identity matrix
    pub fn identity(n: usize) -> FrameResult<Self> {
        check_dimension("matrix size", n)?;
        Ok(Self {
            data: DMatrix::identity(n, n),
        })
    }

    /// Create a matrix from row-major data
    pub fn from_row_slice(nrows: usize, ncols: usize, values: &[f64]) -> FrameResult<Self> {
        check_dimension("matrix row count", nrows)?;
        check_dimension("matrix column count", ncols)?;
        if values.len() != nrows * ncols {
            return Err(FrameError::Configuration(format!(
                "expected {} values for a {}x{} matrix, got {}",
                nrows * ncols,
                nrows,
                ncols,
                values.len()
            )));
        }
        Ok(Self {
            data: DMatrix::from_row_slice(nrows, ncols, values),
        })
    }

    /// Wrap an existing nalgebra matrix
    pub fn from_nalgebra(data: DMatrix<f64>) -> FrameResult<Self> {
        check_dimension("matrix row count", data.nrows())?;
        check_dimension("matrix column count", data.ncols())?;
        Ok(Self { data })
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn is_square(&self) -> bool {
        self.data.is_square()
    }

    /// Borrow the backing nalgebra matrix
    pub fn as_nalgebra(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_nalgebra(self) -> DMatrix<f64> {
        self.data
    }

    /// Element-wise sum
    pub fn add(&self, other: &MatrixDense) -> FrameResult<MatrixDense> {
        if self.shape() != other.shape() {
            return Err(shape_mismatch("matrix addition", self.shape(), other.shape()));
        }
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    /// Element-wise difference
    pub fn sub(&self, other: &MatrixDense) -> FrameResult<MatrixDense> {
        if self.shape() != other.shape() {
            return Err(shape_mismatch("matrix subtraction", self.shape(), other.shape()));
        }
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &MatrixDense) -> FrameResult<MatrixDense> {
        if self.ncols() != other.nrows() {
            return Err(shape_mismatch("matrix product", self.shape(), other.shape()));
        }
        Ok(Self {
            data: &self.data * &other.data,
        })
    }

    pub fn add_scalar(&self, value: f64) -> MatrixDense {
        Self {
            data: self.data.add_scalar(value),
        }
    }

    pub fn sub_scalar(&self, value: f64) -> MatrixDense {
        self.add_scalar(-value)
    }

    pub fn scale(&self, factor: f64) -> MatrixDense {
        Self {
            data: &self.data * factor,
        }
    }

    /// Divide every entry by `divisor`
    pub fn div_scalar(&self, divisor: f64) -> FrameResult<MatrixDense> {
        if divisor == 0.0 {
            return Err(FrameError::Configuration("matrix division by zero".to_string()));
        }
        Ok(Self {
            data: &self.data / divisor,
        })
    }

    pub fn transpose(&self) -> MatrixDense {
        Self {
            data: self.data.transpose(),
        }
    }

    /// Matrix-vector product `A * x`
    pub fn mul_vec(&self, x: &Vector) -> FrameResult<Vector> {
        if self.ncols() != x.len() {
            return Err(shape_mismatch("matrix-vector product", self.shape(), (x.len(), 1)));
        }
        Ok(Vector {
            data: &self.data * &x.data,
        })
    }

    /// Vector-matrix product `x^T * A`, returned as a column vector (`A^T * x`)
    pub fn tr_mul_vec(&self, x: &Vector) -> FrameResult<Vector> {
        if self.nrows() != x.len() {
            return Err(shape_mismatch("vector-matrix product", (1, x.len()), self.shape()));
        }
        Ok(Vector {
            data: self.data.tr_mul(&x.data),
        })
    }

    /// Replicate this matrix `count` times along the diagonal of a larger zero matrix
    pub fn block_diagonal(&self, count: usize) -> FrameResult<MatrixDense> {
        check_dimension("block count", count)?;
        let (r, c) = self.shape();
        let mut out = DMatrix::zeros(r * count, c * count);
        for block in 0..count {
            out.view_mut((block * r, block * c), (r, c))
                .copy_from(&self.data);
        }
        Ok(Self { data: out })
    }

    /// Accumulate `value` into entry `(row, col)`
    #[inline]
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] += value;
    }

    /// Largest absolute entry
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Check `A[i,j] == A[j,i]` within a tolerance relative to the largest entry
    pub fn is_symmetric(&self, rel_tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let tol = rel_tol * self.max_abs().max(f64::MIN_POSITIVE);
        let n = self.nrows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.data[(i, j)] - self.data[(j, i)]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }
}

impl Index<(usize, usize)> for MatrixDense {
    type Output = f64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for MatrixDense {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index]
    }
}

/// Dense column vector
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: DVector<f64>,
}

impl Vector {
    pub fn zeros(len: usize) -> FrameResult<Self> {
        check_dimension("vector length", len)?;
        Ok(Self {
            data: DVector::zeros(len),
        })
    }

    pub fn from_vec(values: Vec<f64>) -> FrameResult<Self> {
        check_dimension("vector length", values.len())?;
        Ok(Self {
            data: DVector::from_vec(values),
        })
    }

    pub fn from_slice(values: &[f64]) -> FrameResult<Self> {
        Self::from_vec(values.to_vec())
    }

    pub fn from_nalgebra(data: DVector<f64>) -> FrameResult<Self> {
        check_dimension("vector length", data.len())?;
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: construction rejects empty vectors
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_nalgebra(&self) -> &DVector<f64> {
        &self.data
    }

    pub fn as_slice(&self) -> &[f64] {
        self.data.as_slice()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data.as_slice().to_vec()
    }

    pub fn add(&self, other: &Vector) -> FrameResult<Vector> {
        if self.len() != other.len() {
            return Err(shape_mismatch("vector addition", (self.len(), 1), (other.len(), 1)));
        }
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    pub fn sub(&self, other: &Vector) -> FrameResult<Vector> {
        if self.len() != other.len() {
            return Err(shape_mismatch("vector subtraction", (self.len(), 1), (other.len(), 1)));
        }
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Self {
            data: &self.data * factor,
        }
    }

    pub fn div_scalar(&self, divisor: f64) -> FrameResult<Vector> {
        if divisor == 0.0 {
            return Err(FrameError::Configuration("vector division by zero".to_string()));
        }
        Ok(Self {
            data: &self.data / divisor,
        })
    }

    pub fn dot(&self, other: &Vector) -> FrameResult<f64> {
        if self.len() != other.len() {
            return Err(shape_mismatch("dot product", (self.len(), 1), (other.len(), 1)));
        }
        Ok(self.data.dot(&other.data))
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.data.norm()
    }

    #[inline]
    pub fn add_at(&mut self, index: usize, value: f64) {
        self.data[index] += value;
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for Vector {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}
