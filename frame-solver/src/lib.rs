//! Frame Solver - linear static analysis of 3D trusses and frames
//!
//! The direct stiffness method on a structure of bars (axial only, three
//! translations per node) and beams (axial, shear, bending and torsion,
//! six DOFs per node):
//! - Nodes merged by position within a tolerance
//! - Reduced system assembled directly from element blocks, fixed DOFs skipped
//! - Direct elimination or Jacobi-preconditioned conjugate gradient
//! - Node displacements, support reactions and member end forces per load case
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut structure = Structure::new();
//!
//! // 1 m steel rod along X
//! let rod = structure
//!     .add_member(MemberSpec::bar(
//!         [0.0, 0.0, 0.0],
//!         [1.0, 0.0, 0.0],
//!         Material::new(2.1e11, 8.1e10, 0.3, 7850.0),
//!         Section::axial(1e-4),
//!     ))
//!     .unwrap();
//!
//! structure.add_support([0.0, 0.0, 0.0], Support::pinned()).unwrap();
//! structure
//!     .add_support([1.0, 0.0, 0.0], Support::with_restraints(false, true, true, false, false, false))
//!     .unwrap();
//!
//! structure.add_load_case(LoadCase::new("Pull")).unwrap();
//! structure.add_point_load("Pull", [1.0, 0.0, 0.0], NodeLoad::fx(1000.0)).unwrap();
//!
//! let solution = structure.solve("Pull", &SolveOptions::default()).unwrap();
//! assert_eq!(solution.displacements.len(), 1);
//!
//! let axial = structure.member_axial_force(rod, "Pull").unwrap();
//! assert!((axial - 1000.0).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod assembly;
pub mod dof;
pub mod elements;
pub mod error;
pub mod json;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;
pub mod solver;
mod spatial;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{SolveOptions, SolverKind};
    pub use crate::dof::{Axis, DofMap, DofScheme};
    pub use crate::elements::{
        Material, Member, MemberId, MemberKind, MemberSpec, Node, NodeId, Section, Support,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::{DisplacementBound, LoadCase, NodeLoad, PointLoad};
    pub use crate::math::{MatrixDense, Vector};
    pub use crate::model::{Structure, StructureConfig};
    pub use crate::results::{
        AnalysisSummary, BoundViolation, MemberForces, NodeDisplacement, Reactions, Solution,
    };
}
