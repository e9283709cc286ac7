//! Global assembly of the direct stiffness method
//!
//! Element blocks are scattered straight into the reduced system: every
//! entry whose row or column axis is fixed is skipped, so no full matrix is
//! ever partitioned. The full 6-per-node matrix is only built for reaction
//! recovery.

use log::{debug, warn};

use crate::dof::{DofMap, DofScheme, DOFS_PER_NODE};
use crate::elements::{ElementStiffness, Member, MemberKind};
use crate::error::{FrameError, FrameResult};
use crate::loads::LoadCase;
use crate::math::{MatrixDense, Vector};

/// Frame scheme as soon as any beam exists, truss scheme otherwise
pub fn select_scheme(members: &[Member]) -> DofScheme {
    if members.iter().any(|m| m.kind() == MemberKind::Beam) {
        DofScheme::Frame6
    } else {
        DofScheme::Truss3
    }
}

/// Add the four quarter blocks of one element into the reduced matrix
pub fn scatter_element(
    k: &mut MatrixDense,
    element: &ElementStiffness,
    dofs: &DofMap,
    scheme: DofScheme,
) -> FrameResult<()> {
    let dpn = element.dofs_per_node;
    if dpn > scheme.dofs_per_node() {
        return Err(FrameError::Configuration(format!(
            "{}-DOF element cannot be assembled in the {:?} scheme",
            dpn, scheme
        )));
    }

    // From-From, To-From, From-To, To-To
    for (row_end, col_end) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let row_node = element.nodes[row_end].index();
        let col_node = element.nodes[col_end].index();
        for a in 0..dpn {
            let Some(row) = dofs.reduced_index(scheme, row_node, a) else {
                continue;
            };
            for b in 0..dpn {
                let Some(col) = dofs.reduced_index(scheme, col_node, b) else {
                    continue;
                };
                k.add_at(row, col, element.block_entry(row_end, col_end, a, b));
            }
        }
    }
    Ok(())
}

/// Reduced stiffness matrix in `scheme`
///
/// Fails with a configuration error when the scheme has no free DOFs.
pub fn assemble_stiffness(
    members: &[Member],
    dofs: &DofMap,
    scheme: DofScheme,
) -> FrameResult<MatrixDense> {
    let n_free = dofs.n_free(scheme);
    debug!(
        "assembling {}x{} stiffness matrix ({:?}, {} members)",
        n_free,
        n_free,
        scheme,
        members.len()
    );

    let mut k = MatrixDense::zeros(n_free, n_free)?;
    for member in members {
        let element = member.element_stiffness()?;
        scatter_element(&mut k, &element, dofs, scheme)?;
    }
    Ok(k)
}

/// Reduced load vector in `scheme`
///
/// Repeated loads at a node add up. In the truss scheme moment components
/// have nowhere to go and are dropped with a warning.
pub fn assemble_loads(case: &LoadCase, dofs: &DofMap, scheme: DofScheme) -> FrameResult<Vector> {
    let mut f = Vector::zeros(dofs.n_free(scheme))?;
    let dpn = scheme.dofs_per_node();

    for pl in &case.point_loads {
        let node = pl.node.index();
        if node >= dofs.node_count() {
            return Err(FrameError::NodeIndexOutOfRange(node));
        }
        if dpn == 3 && pl.load.has_moment() {
            warn!(
                "load case '{}': moment at node {} ignored, structure has no rotational DOFs",
                case.name, node
            );
        }

        let components = pl.load.as_array();
        for axis in 0..dpn {
            if let Some(idx) = dofs.reduced_index(scheme, node, axis) {
                f.add_at(idx, components[axis]);
            }
        }
    }
    Ok(f)
}

/// Full 6n x 6n stiffness matrix with no DOFs removed
///
/// Bar blocks land on the translation axes of each node.
pub fn assemble_full_stiffness(members: &[Member], node_count: usize) -> FrameResult<MatrixDense> {
    let n = node_count * DOFS_PER_NODE;
    let mut k = MatrixDense::zeros(n, n)?;

    for member in members {
        let element = member.element_stiffness()?;
        let dpn = element.dofs_per_node;
        for (row_end, col_end) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let row_base = element.nodes[row_end].index() * DOFS_PER_NODE;
            let col_base = element.nodes[col_end].index() * DOFS_PER_NODE;
            for a in 0..dpn {
                for b in 0..dpn {
                    k.add_at(
                        row_base + a,
                        col_base + b,
                        element.block_entry(row_end, col_end, a, b),
                    );
                }
            }
        }
    }
    Ok(k)
}

/// Accumulated loads of `case` in the full 6-per-node layout
pub fn full_load_vector(case: &LoadCase, node_count: usize) -> FrameResult<Vec<f64>> {
    let mut f = vec![0.0; node_count * DOFS_PER_NODE];
    for pl in &case.point_loads {
        let node = pl.node.index();
        if node >= node_count {
            return Err(FrameError::NodeIndexOutOfRange(node));
        }
        for (axis, value) in pl.load.as_array().into_iter().enumerate() {
            f[node * DOFS_PER_NODE + axis] += value;
        }
    }
    Ok(f)
}
