//! Member element - axial bar or 3D frame beam

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Material, NodeId, Section};
use crate::error::FrameResult;
use crate::math::{
    frame_local_stiffness, local_axes, to_global, transformation_matrix, truss_local_stiffness,
    MatrixDense, Triad,
};
use crate::results::MemberForces;

/// Stable index of a member in its structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub usize);

impl MemberId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Member formulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    /// Pin-ended, axial force only, 3 DOFs per end
    Bar,
    /// Rigid-jointed, axial, shear, bending and torsion, 6 DOFs per end
    Beam,
}

impl MemberKind {
    pub fn dofs_per_node(self) -> usize {
        match self {
            MemberKind::Bar => 3,
            MemberKind::Beam => 6,
        }
    }
}

/// Description of a member to insert into a structure
///
/// End points are positions; the structure resolves them to merged nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSpec {
    pub kind: MemberKind,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub material: Material,
    pub section: Section,
    /// Roll about the member axis (radians)
    #[serde(default)]
    pub rotation: f64,
}

impl MemberSpec {
    pub fn bar(start: [f64; 3], end: [f64; 3], material: Material, section: Section) -> Self {
        Self {
            kind: MemberKind::Bar,
            start,
            end,
            material,
            section,
            rotation: 0.0,
        }
    }

    pub fn beam(start: [f64; 3], end: [f64; 3], material: Material, section: Section) -> Self {
        Self {
            kind: MemberKind::Beam,
            ..Self::bar(start, end, material, section)
        }
    }

    /// Set member rotation about its longitudinal axis
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Element stiffness in global coordinates, ordered [i-node DOFs, j-node DOFs]
#[derive(Debug, Clone)]
pub struct ElementStiffness {
    pub nodes: [NodeId; 2],
    /// 3 for a bar (6×6 matrix), 6 for a beam (12×12 matrix)
    pub dofs_per_node: usize,
    pub matrix: MatrixDense,
}

impl ElementStiffness {
    /// Entry of the quarter block coupling end `row_end` axis `a` to end `col_end` axis `b`
    #[inline]
    pub fn block_entry(&self, row_end: usize, col_end: usize, a: usize, b: usize) -> f64 {
        let n = self.dofs_per_node;
        self.matrix[(row_end * n + a, col_end * n + b)]
    }
}

/// Per-load-case member results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberResult {
    /// Local end forces [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, ..., Mz_j]
    pub local_forces: [f64; 12],
    /// Global end forces, same layout
    pub global_forces: [f64; 12],
    /// Local end displacements, same layout
    pub local_displacements: [f64; 12],
}

/// A member placed in a structure
#[derive(Debug, Clone)]
pub struct Member {
    pub(crate) id: MemberId,
    pub(crate) kind: MemberKind,
    pub(crate) i_node: NodeId,
    pub(crate) j_node: NodeId,
    pub(crate) material: Material,
    pub(crate) section: Section,
    pub(crate) rotation: f64,
    pub(crate) length: f64,
    /// Unit vector from i-node to j-node
    pub(crate) direction: [f64; 3],
    pub(crate) axes: Triad,

    pub(crate) results: HashMap<String, MemberResult>,
}

impl Member {
    pub(crate) fn new(
        id: MemberId,
        spec: MemberSpec,
        i_node: NodeId,
        j_node: NodeId,
        i_pos: [f64; 3],
        j_pos: [f64; 3],
    ) -> FrameResult<Self> {
        let is_beam = spec.kind == MemberKind::Beam;
        spec.material.validate(is_beam)?;
        spec.section.validate(is_beam)?;

        let axes = local_axes(&i_pos, &j_pos, spec.rotation)?;
        let d = [j_pos[0] - i_pos[0], j_pos[1] - i_pos[1], j_pos[2] - i_pos[2]];
        let length = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();

        Ok(Self {
            id,
            kind: spec.kind,
            i_node,
            j_node,
            material: spec.material,
            section: spec.section,
            rotation: spec.rotation,
            length,
            direction: axes[0],
            axes,
            results: HashMap::new(),
        })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn nodes(&self) -> [NodeId; 2] {
        [self.i_node, self.j_node]
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn direction(&self) -> [f64; 3] {
        self.direction
    }

    /// Local triad: rows are the local x, y and z axes in global coordinates
    pub fn local_axes(&self) -> &Triad {
        &self.axes
    }

    /// Local stiffness matrix (6×6 bar, 12×12 beam)
    pub fn local_stiffness(&self) -> FrameResult<MatrixDense> {
        let mat = &self.material;
        let sec = &self.section;
        match self.kind {
            MemberKind::Bar => truss_local_stiffness(mat.e, sec.a, self.length),
            MemberKind::Beam => {
                frame_local_stiffness(mat.e, mat.g, sec.a, sec.iy, sec.iz, sec.j, self.length)
            }
        }
    }

    /// Global-to-local transformation matrix
    pub fn transformation(&self) -> FrameResult<MatrixDense> {
        transformation_matrix(&self.axes, self.kind.dofs_per_node())
    }

    /// Stiffness in global coordinates, Tᵀ k T
    pub fn element_stiffness(&self) -> FrameResult<ElementStiffness> {
        let k_local = self.local_stiffness()?;
        let t = self.transformation()?;
        Ok(ElementStiffness {
            nodes: self.nodes(),
            dofs_per_node: self.kind.dofs_per_node(),
            matrix: to_global(&k_local, &t)?,
        })
    }

    pub fn result(&self, case: &str) -> Option<&MemberResult> {
        self.results.get(case)
    }

    /// Local end forces for a load case
    /// Returns [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, Fy_j, Fz_j, Mx_j, My_j, Mz_j]
    pub fn local_force(&self, case: &str) -> Option<[f64; 12]> {
        self.results.get(case).map(|r| r.local_forces)
    }

    pub fn global_force(&self, case: &str) -> Option<[f64; 12]> {
        self.results.get(case).map(|r| r.global_forces)
    }

    /// Axial force, positive in tension
    pub fn axial(&self, case: &str) -> Option<f64> {
        self.local_force(case).map(|f| -f[0])
    }

    /// Internal forces at the i-end
    pub fn forces_i(&self, case: &str) -> Option<MemberForces> {
        self.local_force(case).map(|f| MemberForces::at_i(&f))
    }

    /// Internal forces at the j-end
    pub fn forces_j(&self, case: &str) -> Option<MemberForces> {
        self.local_force(case).map(|f| MemberForces::at_j(&f))
    }

    /// Largest end moment magnitude about either bending axis
    pub fn max_moment(&self, case: &str) -> Option<f64> {
        let f = self.local_force(case)?;
        Some(f[4].abs().max(f[10].abs()).max(f[5].abs()).max(f[11].abs()))
    }

    pub(crate) fn clear_results(&mut self, case: &str) {
        self.results.remove(case);
    }
}
