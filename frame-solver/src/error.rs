//! Error types for the frame solver

use thiserror::Error;

/// Main error type for structure building and solving
#[derive(Error, Debug)]
pub enum FrameError {
    // Configuration errors: bad dimensions or mismatched operands.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // Model errors: rejected at the mutating API.
    #[error("Duplicate member between nodes {0} and {1}")]
    DuplicateMember(usize, usize),

    #[error("Invalid load case name '{0}'")]
    InvalidLoadCaseName(String),

    #[error("Load case '{0}' already exists")]
    DuplicateLoadCase(String),

    #[error("Load case '{0}' not found in structure")]
    LoadCaseNotFound(String),

    #[error("No node at position ({0}, {1}, {2})")]
    NodeNotFound(f64, f64, f64),

    #[error("Node index {0} out of range")]
    NodeIndexOutOfRange(usize),

    #[error("Member index {0} out of range")]
    MemberNotFound(usize),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Load case '{0}' not analyzed - run solve() first")]
    NotAnalyzed(String),

    // Numerical errors: the caller may change the model or options and retry.
    #[error("Singular stiffness matrix at row {row} (pivot {pivot:e}) - structure may be unstable or under-restrained")]
    SingularMatrix { row: usize, pivot: f64 },

    #[error("Conjugate gradient did not converge after {iterations} iterations (relative residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    #[error("Ill-conditioned system: {0}")]
    IllConditioned(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FrameError {
    /// True for failures raised by the linear solvers rather than by model input
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            FrameError::SingularMatrix { .. }
                | FrameError::NotConverged { .. }
                | FrameError::IllConditioned(_)
        )
    }
}

/// Result type for frame solver operations
pub type FrameResult<T> = Result<T, FrameError>;
