//! Sparse storage for the iterative solver
//!
//! Reduced stiffness matrices are mostly zeros. The conjugate gradient
//! solver only needs matrix-vector products, so the dense matrix is packed
//! into CSR once and every iteration pays for the non-zeros only.

use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use super::dense::MatrixDense;

/// Entries with magnitude at or below this are dropped when packing
const DROP_TOLERANCE: f64 = 1e-300;

/// Pack a dense matrix into CSR format
pub fn to_csr(matrix: &MatrixDense) -> CsrMatrix<f64> {
    let (nrows, ncols) = matrix.shape();
    let mut coo = CooMatrix::new(nrows, ncols);

    for row in 0..nrows {
        for col in 0..ncols {
            let val = matrix[(row, col)];
            if val.abs() > DROP_TOLERANCE {
                coo.push(row, col, val);
            }
        }
    }

    CsrMatrix::from(&coo)
}

/// Sparse matrix-vector multiplication
#[inline]
pub fn csr_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let start = row_offsets[row];
        let end = row_offsets[row + 1];

        let mut sum = 0.0;
        for idx in start..end {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }

    y
}

/// Diagonal of a CSR matrix (zero where no diagonal entry is stored)
pub fn csr_diagonal(csr: &CsrMatrix<f64>) -> DVector<f64> {
    let mut diag = DVector::zeros(csr.nrows());
    for (row, col, &val) in csr.triplet_iter() {
        if row == col {
            diag[row] += val;
        }
    }
    diag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_matches_dense_product() {
        let a = MatrixDense::from_row_slice(
            3,
            3,
            &[4.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 4.0],
        )
        .unwrap();
        let csr = to_csr(&a);
        assert_eq!(csr.nnz(), 7);

        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let y = csr_matvec(&csr, &x);
        let expected = a.as_nalgebra() * &x;
        assert!((y - expected).norm() < 1e-12);
    }

    #[test]
    fn test_diagonal_extraction() {
        let a = MatrixDense::from_row_slice(2, 2, &[5.0, 1.0, 1.0, 0.0]).unwrap();
        let diag = csr_diagonal(&to_csr(&a));
        assert_eq!(diag[0], 5.0);
        assert_eq!(diag[1], 0.0);
    }
}
