//! Solver selection and options

use serde::{Deserialize, Serialize};

/// Linear solver backend used for the reduced system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// LU factorization with partial pivoting, O(n³)
    Direct,
    /// Conjugate gradient on sparse storage; symmetric positive definite systems only
    ConjugateGradient,
}

impl Default for SolverKind {
    fn default() -> Self {
        Self::Direct
    }
}

/// Options for a single solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Solver backend
    pub solver: SolverKind,
    /// Iteration cap for conjugate gradient
    pub cg_max_iterations: usize,
    /// Conjugate gradient stops once ||r|| <= cg_tolerance * ||f||
    pub cg_tolerance: f64,
    /// Scale conjugate gradient by the inverse diagonal
    pub jacobi_preconditioner: bool,
    /// Direct elimination fails when a pivot falls below pivot_tolerance * max|K_ij|
    pub pivot_tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            solver: SolverKind::Direct,
            cg_max_iterations: 10_000,
            cg_tolerance: 1e-10,
            jacobi_preconditioner: true,
            pivot_tolerance: 1e-12,
        }
    }
}

impl SolveOptions {
    /// Options for the direct solver
    pub fn direct() -> Self {
        Self::default()
    }

    /// Options for the conjugate gradient solver
    pub fn conjugate_gradient() -> Self {
        Self {
            solver: SolverKind::ConjugateGradient,
            ..Self::default()
        }
    }

    /// Set maximum conjugate gradient iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.cg_max_iterations = max_iter;
        self
    }

    /// Set conjugate gradient relative residual tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.cg_tolerance = tol;
        self
    }

    /// Set relative pivot threshold for direct elimination
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Run plain (unpreconditioned) conjugate gradient
    pub fn without_preconditioner(mut self) -> Self {
        self.jacobi_preconditioner = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_explicit() {
        let opts = SolveOptions::default();
        assert_eq!(opts.solver, SolverKind::Direct);
        assert_eq!(opts.cg_max_iterations, 10_000);
        assert!(opts.jacobi_preconditioner);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: SolveOptions =
            serde_json::from_str(r#"{"solver":"ConjugateGradient","cg_tolerance":1e-8}"#).unwrap();
        assert_eq!(opts.solver, SolverKind::ConjugateGradient);
        assert_eq!(opts.cg_tolerance, 1e-8);
        assert_eq!(opts.cg_max_iterations, 10_000);
    }

    #[test]
    fn test_builders() {
        let opts = SolveOptions::conjugate_gradient()
            .with_max_iter(50)
            .with_tolerance(1e-6)
            .without_preconditioner()
            .with_pivot_tolerance(1e-10);
        assert_eq!(opts.solver, SolverKind::ConjugateGradient);
        assert_eq!(opts.cg_max_iterations, 50);
        assert_eq!(opts.cg_tolerance, 1e-6);
        assert!(!opts.jacobi_preconditioner);
        assert_eq!(opts.pivot_tolerance, 1e-10);
    }
}
