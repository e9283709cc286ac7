//! Result types for frame and truss analysis

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analysis::SolverKind;
use crate::dof::{Axis, DofScheme};
use crate::elements::{MemberId, NodeId};

/// Translations (m) and rotations (rad) of one node, global axes
///
/// Fixed axes are exactly zero, as are rotations of an all-bar structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl NodeDisplacement {
    /// Components in `Axis` order
    pub fn from_array(arr: [f64; 6]) -> Self {
        let [dx, dy, dz, rx, ry, rz] = arr;
        Self { dx, dy, dz, rx, ry, rz }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// Support reaction in global axes (N, N·m)
///
/// Only restrained axes carry a value; the rest stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }
}

/// Internal forces at one end of a member, in local axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force in local y direction
    pub shear_y: f64,
    /// Shear force in local z direction
    pub shear_z: f64,
    /// Torsion
    pub torsion: f64,
    /// Bending moment about local y axis
    pub moment_y: f64,
    /// Bending moment about local z axis
    pub moment_z: f64,
}

impl MemberForces {
    /// From local end forces, i-end
    pub fn at_i(forces: &[f64; 12]) -> Self {
        Self {
            axial: -forces[0],
            shear_y: forces[1],
            shear_z: forces[2],
            torsion: -forces[3],
            moment_y: forces[4],
            moment_z: forces[5],
        }
    }

    /// From local end forces, j-end
    pub fn at_j(forces: &[f64; 12]) -> Self {
        Self {
            axial: forces[6],
            shear_y: -forces[7],
            shear_z: -forces[8],
            torsion: forces[9],
            moment_y: forces[10],
            moment_z: forces[11],
        }
    }
}

/// Outcome of one `Structure::solve` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub load_case: String,
    /// Numbering scheme the system was assembled in
    pub scheme: DofScheme,
    /// Reduced displacement vector, one entry per free DOF
    pub displacements: Vec<f64>,
    pub solver: SolverKind,
    /// Wall-clock time spent in the linear solver
    pub solve_time: Duration,
    /// Conjugate gradient iterations; `None` for direct elimination
    pub iterations: Option<usize>,
    /// Relative residual ||f - K u|| / ||f||
    pub residual: f64,
}

impl Solution {
    pub fn n_free(&self) -> usize {
        self.displacements.len()
    }
}

/// A displacement outside its bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundViolation {
    pub node: NodeId,
    pub axis: Axis,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BoundViolation {
    /// Distance from the violated limit
    pub fn excess(&self) -> f64 {
        if self.value > self.upper {
            self.value - self.upper
        } else {
            self.lower - self.value
        }
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    pub max_disp_node: Option<NodeId>,
    /// Maximum reaction force magnitude
    pub max_reaction: f64,
    pub max_reaction_node: Option<NodeId>,
    /// Maximum member axial force magnitude
    pub max_axial: f64,
    pub max_axial_member: Option<MemberId>,
    /// Maximum member end moment magnitude
    pub max_moment: f64,
    pub max_moment_member: Option<MemberId>,
    pub num_nodes: usize,
    pub num_members: usize,
    /// Nominal DOFs in the active scheme
    pub total_dofs: usize,
    /// Unknowns in the active scheme
    pub free_dofs: usize,
    pub bound_violations: usize,
}
