//! Degree-of-freedom numbering
//!
//! A [`DofMap`] is a pure function of the node order and each node's six
//! fixity flags. It numbers every unfixed (node, axis) pair with a
//! contiguous reduced index, once for the translation-only truss scheme and
//! once for the full frame scheme. Both counters walk the nodes in stored
//! order and the axes in the order Dx, Dy, Dz, Rx, Ry, Rz, so the numbering
//! is a compaction with no gaps.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Nominal DOFs per node
pub const DOFS_PER_NODE: usize = 6;

/// One nodal degree of freedom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Dx,
    Dy,
    Dz,
    Rx,
    Ry,
    Rz,
}

impl Axis {
    pub const ALL: [Axis; 6] = [Axis::Dx, Axis::Dy, Axis::Dz, Axis::Rx, Axis::Ry, Axis::Rz];

    /// Position in the nodal [Dx, Dy, Dz, Rx, Ry, Rz] layout
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_translation(self) -> bool {
        self.index() < 3
    }
}

/// Numbering scheme used by an assembly pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DofScheme {
    /// Translations only, used when every member is a bar
    Truss3,
    /// Translations and rotations, used as soon as any beam exists
    Frame6,
}

impl DofScheme {
    pub fn dofs_per_node(self) -> usize {
        match self {
            DofScheme::Truss3 => 3,
            DofScheme::Frame6 => 6,
        }
    }
}

/// Reduced DOF numbering for one support configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DofMap {
    /// Fixed flags, 6 per node in node order
    fixed: Vec<bool>,
    truss: Vec<[Option<usize>; 3]>,
    frame: Vec<[Option<usize>; 6]>,
    n_free_truss: usize,
    n_free_frame: usize,
    fixed_translations: usize,
    fixed_rotations: usize,
}

impl DofMap {
    /// Number the free DOFs of nodes with the given fixities
    pub fn build(fixities: &[[bool; 6]]) -> Self {
        let mut map = DofMap {
            fixed: Vec::with_capacity(fixities.len() * DOFS_PER_NODE),
            truss: Vec::with_capacity(fixities.len()),
            frame: Vec::with_capacity(fixities.len()),
            ..Default::default()
        };

        for fixity in fixities {
            let mut truss = [None; 3];
            let mut frame = [None; 6];

            for axis in 0..DOFS_PER_NODE {
                map.fixed.push(fixity[axis]);
                if fixity[axis] {
                    if axis < 3 {
                        map.fixed_translations += 1;
                    } else {
                        map.fixed_rotations += 1;
                    }
                    continue;
                }
                if axis < 3 {
                    truss[axis] = Some(map.n_free_truss);
                    map.n_free_truss += 1;
                }
                frame[axis] = Some(map.n_free_frame);
                map.n_free_frame += 1;
            }

            map.truss.push(truss);
            map.frame.push(frame);
        }

        map
    }

    pub fn node_count(&self) -> usize {
        self.frame.len()
    }

    /// Number of nominal DOFs in the full 6-per-node layout
    pub fn total_dofs(&self) -> usize {
        self.fixed.len()
    }

    /// Number of free DOFs in `scheme`
    pub fn n_free(&self, scheme: DofScheme) -> usize {
        match scheme {
            DofScheme::Truss3 => self.n_free_truss,
            DofScheme::Frame6 => self.n_free_frame,
        }
    }

    pub fn fixed_translations(&self) -> usize {
        self.fixed_translations
    }

    pub fn fixed_rotations(&self) -> usize {
        self.fixed_rotations
    }

    pub fn free_translations(&self) -> usize {
        3 * self.node_count() - self.fixed_translations
    }

    pub fn free_rotations(&self) -> usize {
        3 * self.node_count() - self.fixed_rotations
    }

    /// Fixed flags for the full 6-per-node layout
    pub fn fixed_bitmap(&self) -> &[bool] {
        &self.fixed
    }

    /// Reduced index of `(node, axis)` in `scheme`, `None` if fixed
    ///
    /// `axis` counts within the scheme: 0..3 for the truss scheme, 0..6 for
    /// the frame scheme. Axes 0..3 are the translations in both.
    #[inline]
    pub fn reduced_index(&self, scheme: DofScheme, node: usize, axis: usize) -> Option<usize> {
        match scheme {
            DofScheme::Truss3 => self.truss[node][axis],
            DofScheme::Frame6 => self.frame[node][axis],
        }
    }

    /// Free (node, axis) pairs in reduced-index order
    pub fn free_dofs(&self, scheme: DofScheme) -> Vec<(usize, usize)> {
        let dpn = scheme.dofs_per_node();
        let mut out = Vec::with_capacity(self.n_free(scheme));
        for node in 0..self.node_count() {
            for axis in 0..dpn {
                if self.reduced_index(scheme, node, axis).is_some() {
                    out.push((node, axis));
                }
            }
        }
        out
    }

    /// Expand a reduced vector to the full 6-per-node layout
    ///
    /// Fixed axes are zero, and so is every rotation in the truss scheme.
    pub fn expand(&self, scheme: DofScheme, reduced: &[f64]) -> FrameResult<Vec<f64>> {
        if reduced.len() != self.n_free(scheme) {
            return Err(FrameError::Configuration(format!(
                "reduced vector has length {}, scheme {:?} has {} free DOFs",
                reduced.len(),
                scheme,
                self.n_free(scheme)
            )));
        }

        let mut full = vec![0.0; self.total_dofs()];
        for node in 0..self.node_count() {
            for axis in 0..scheme.dofs_per_node() {
                if let Some(idx) = self.reduced_index(scheme, node, axis) {
                    full[node * DOFS_PER_NODE + axis] = reduced[idx];
                }
            }
        }
        Ok(full)
    }

    /// Restrict a full 6-per-node vector to the free DOFs of `scheme`
    pub fn reduce(&self, scheme: DofScheme, full: &[f64]) -> FrameResult<Vec<f64>> {
        if full.len() != self.total_dofs() {
            return Err(FrameError::Configuration(format!(
                "full vector has length {}, expected {}",
                full.len(),
                self.total_dofs()
            )));
        }

        let mut reduced = vec![0.0; self.n_free(scheme)];
        for node in 0..self.node_count() {
            for axis in 0..scheme.dofs_per_node() {
                if let Some(idx) = self.reduced_index(scheme, node, axis) {
                    reduced[idx] = full[node * DOFS_PER_NODE + axis];
                }
            }
        }
        Ok(reduced)
    }
}
