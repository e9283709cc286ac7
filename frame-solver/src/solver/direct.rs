//! Direct factorization

use super::{check_system, relative_residual, LinearSolution, LinearSolver};
use crate::error::{FrameError, FrameResult};
use crate::math::{MatrixDense, Vector};

/// LU factorization with partial pivoting
#[derive(Debug, Clone, Copy)]
pub struct DirectSolver {
    pivot_tolerance: f64,
}

impl DirectSolver {
    pub fn new(pivot_tolerance: f64) -> Self {
        Self { pivot_tolerance }
    }
}

impl LinearSolver for DirectSolver {
    fn solve(&self, a: &MatrixDense, b: &Vector) -> FrameResult<LinearSolution> {
        let x = lu_solve(a, b, self.pivot_tolerance)?;
        let residual = relative_residual(a, &x, b)?;
        Ok(LinearSolution {
            x,
            iterations: None,
            residual,
        })
    }

    fn name(&self) -> &str {
        "LU decomposition"
    }
}

/// Solve `a * x = b` through nalgebra's partially pivoted LU
///
/// Fails with [`FrameError::SingularMatrix`] on the first diagonal entry of
/// `U` at or below `pivot_tolerance * max|a_ij|`.
pub fn lu_solve(a: &MatrixDense, b: &Vector, pivot_tolerance: f64) -> FrameResult<Vector> {
    check_system(a, b)?;

    let threshold = pivot_tolerance * a.max_abs();
    let lu = a.as_nalgebra().clone().lu();

    if let Some((row, &pivot)) = lu
        .u()
        .diagonal()
        .iter()
        .enumerate()
        .find(|(_, p)| p.abs() <= threshold || **p == 0.0)
    {
        return Err(FrameError::SingularMatrix { row, pivot });
    }

    let x = lu.solve(b.as_nalgebra()).ok_or_else(|| {
        FrameError::IllConditioned("LU solve rejected a factorization with nonzero pivots".to_string())
    })?;

    if x.iter().any(|v| !v.is_finite()) {
        return Err(FrameError::IllConditioned(
            "LU solve produced non-finite displacements".to_string(),
        ));
    }

    Vector::from_nalgebra(x)
}
