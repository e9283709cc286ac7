//! Conjugate gradient

use log::warn;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;

use super::{check_system, LinearSolution, LinearSolver};
use crate::error::{FrameError, FrameResult};
use crate::math::{csr_diagonal, csr_matvec, to_csr, MatrixDense, Vector};

/// Outcome of a conjugate gradient run, converged or not
#[derive(Debug, Clone)]
pub struct CgOutcome {
    /// Current iterate
    pub x: DVector<f64>,
    /// Iterations performed
    pub iterations: usize,
    /// Relative residual ||r|| / ||b|| of the returned iterate
    pub residual: f64,
    pub converged: bool,
}

/// Solve a sparse SPD system using (optionally Jacobi-preconditioned) conjugate gradient
///
/// Always returns the last iterate; `converged` tells whether the relative
/// residual reached `tol`. Only a breakdown that makes further iteration
/// meaningless (non-positive diagonal or curvature) is an error.
pub fn conjugate_gradient(
    csr: &CsrMatrix<f64>,
    b: &DVector<f64>,
    tol: f64,
    max_iter: usize,
    jacobi: bool,
) -> FrameResult<CgOutcome> {
    let n = csr.nrows();

    let diag = csr_diagonal(csr);
    for i in 0..n {
        if diag[i] <= 0.0 {
            return Err(FrameError::SingularMatrix { row: i, pivot: diag[i] });
        }
    }
    let precondition = |r: &DVector<f64>| -> DVector<f64> {
        if jacobi {
            r.component_div(&diag)
        } else {
            r.clone()
        }
    };

    let b_norm = b.norm();
    let mut x = DVector::zeros(n);
    if b_norm == 0.0 {
        return Ok(CgOutcome {
            x,
            iterations: 0,
            residual: 0.0,
            converged: true,
        });
    }

    let mut r = b.clone();
    let mut z = precondition(&r);
    let mut p = z.clone();
    let mut r_dot_z = r.dot(&z);
    let mut residual = 1.0;

    for iter in 0..max_iter {
        let ap = csr_matvec(csr, &p);
        let p_dot_ap = p.dot(&ap);

        if p_dot_ap <= 0.0 || !p_dot_ap.is_finite() {
            return Err(FrameError::IllConditioned(format!(
                "conjugate gradient breakdown at iteration {} (p.Ap = {:e}); matrix is not positive definite",
                iter, p_dot_ap
            )));
        }

        let alpha = r_dot_z / p_dot_ap;

        // x = x + alpha * p
        x.axpy(alpha, &p, 1.0);

        // r = r - alpha * Ap
        r.axpy(-alpha, &ap, 1.0);

        residual = r.norm() / b_norm;
        if residual <= tol {
            return Ok(CgOutcome {
                x,
                iterations: iter + 1,
                residual,
                converged: true,
            });
        }

        z = precondition(&r);
        let r_dot_z_new = r.dot(&z);
        let beta = r_dot_z_new / r_dot_z;
        r_dot_z = r_dot_z_new;

        // p = z + beta * p
        p = &z + beta * &p;
    }

    Ok(CgOutcome {
        x,
        iterations: max_iter,
        residual,
        converged: false,
    })
}

/// Conjugate gradient strategy; non-convergence is an error
#[derive(Debug, Clone, Copy)]
pub struct ConjugateGradientSolver {
    max_iterations: usize,
    tolerance: f64,
    jacobi: bool,
}

impl ConjugateGradientSolver {
    pub fn new(max_iterations: usize, tolerance: f64, jacobi: bool) -> Self {
        Self {
            max_iterations,
            tolerance,
            jacobi,
        }
    }
}

impl LinearSolver for ConjugateGradientSolver {
    fn solve(&self, a: &MatrixDense, b: &Vector) -> FrameResult<LinearSolution> {
        check_system(a, b)?;

        let csr = to_csr(a);
        let outcome = conjugate_gradient(
            &csr,
            b.as_nalgebra(),
            self.tolerance,
            self.max_iterations,
            self.jacobi,
        )?;

        if !outcome.converged {
            warn!(
                "conjugate gradient stopped after {} iterations, relative residual {:e} > {:e}",
                outcome.iterations, outcome.residual, self.tolerance
            );
            return Err(FrameError::NotConverged {
                iterations: outcome.iterations,
                residual: outcome.residual,
            });
        }

        Ok(LinearSolution {
            x: Vector::from_nalgebra(outcome.x)?,
            iterations: Some(outcome.iterations),
            residual: outcome.residual,
        })
    }

    fn name(&self) -> &str {
        "Conjugate gradient"
    }
}
