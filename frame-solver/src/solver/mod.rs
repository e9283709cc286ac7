//! Linear system solvers for the reduced system `K u = f`
//!
//! Two strategies sit behind the [`LinearSolver`] trait:
//!
//! - [`DirectSolver`]: nalgebra LU with partial pivoting. Exact up to
//!   round-off, cubic cost, fails with [`FrameError::SingularMatrix`] when a
//!   pivot drops below the relative threshold.
//! - [`ConjugateGradientSolver`]: iterative, sparse matrix-vector products
//!   only. Requires a symmetric positive definite matrix; fails with
//!   [`FrameError::IllConditioned`] on a non-positive curvature `p.Ap` and
//!   with [`FrameError::NotConverged`] when the iteration cap is reached.

mod cg;
mod direct;

pub use cg::{conjugate_gradient, CgOutcome, ConjugateGradientSolver};
pub use direct::{lu_solve, DirectSolver};

use crate::analysis::{SolveOptions, SolverKind};
use crate::error::{FrameError, FrameResult};
use crate::math::{MatrixDense, Vector};

/// Result of a linear solve
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Solution vector
    pub x: Vector,
    /// Iterations used (iterative solvers only)
    pub iterations: Option<usize>,
    /// Final relative residual ||b - A x|| / ||b||
    pub residual: f64,
}

/// Linear solver interface
pub trait LinearSolver {
    /// Solve `a * x = b`
    fn solve(&self, a: &MatrixDense, b: &Vector) -> FrameResult<LinearSolution>;

    /// Solver name for diagnostics
    fn name(&self) -> &str;
}

/// Build the solver selected by `options`
pub fn solver_for(options: &SolveOptions) -> Box<dyn LinearSolver> {
    match options.solver {
        SolverKind::Direct => Box::new(DirectSolver::new(options.pivot_tolerance)),
        SolverKind::ConjugateGradient => Box::new(ConjugateGradientSolver::new(
            options.cg_max_iterations,
            options.cg_tolerance,
            options.jacobi_preconditioner,
        )),
    }
}

/// Check that `a` is square and matches `b`
pub(crate) fn check_system(a: &MatrixDense, b: &Vector) -> FrameResult<()> {
    if !a.is_square() {
        return Err(FrameError::Configuration(format!(
            "system matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() != b.len() {
        return Err(FrameError::Configuration(format!(
            "right-hand side has length {}, system has {} rows",
            b.len(),
            a.nrows()
        )));
    }
    Ok(())
}

/// Relative residual ||b - A x|| / ||b||, or ||A x|| when b is zero
pub(crate) fn relative_residual(a: &MatrixDense, x: &Vector, b: &Vector) -> FrameResult<f64> {
    let r = b.sub(&a.mul_vec(x)?)?;
    let b_norm = b.norm();
    Ok(if b_norm > 0.0 { r.norm() / b_norm } else { r.norm() })
}

/// Solve `a * x = b` with the solver selected by `options`
pub fn solve(a: &MatrixDense, b: &Vector, options: &SolveOptions) -> FrameResult<LinearSolution> {
    solver_for(options).solve(a, b)
}
