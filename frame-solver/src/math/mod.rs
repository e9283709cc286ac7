//! Mathematical utilities for stiffness calculations

pub mod dense;
pub mod sparse;

pub use dense::{MatrixDense, Vector};
pub use sparse::{csr_diagonal, csr_matvec, to_csr};

use crate::error::{FrameError, FrameResult};

/// Local member axes as rows: `[x, y, z]`, each a unit vector in global coordinates
pub type Triad = [[f64; 3]; 3];

/// Geometric tolerance below which a length or direction component is treated as zero
pub const GEOMETRY_EPS: f64 = 1e-10;

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

/// Compute the local axis triad of a 2-node member
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
/// * `rotation` - Member roll about its longitudinal axis (radians)
///
/// Conventions:
/// - vertical members: y in the global XY plane (-X when pointing up, +X when down), z = global Z
/// - horizontal members: y = global Y, z = x cross y
/// - inclined members: z horizontal and perpendicular to x, y = z cross x
pub fn local_axes(i_node: &[f64; 3], j_node: &[f64; 3], rotation: f64) -> FrameResult<Triad> {
    let dx = j_node[0] - i_node[0];
    let dy = j_node[1] - i_node[1];
    let dz = j_node[2] - i_node[2];

    let length = (dx * dx + dy * dy + dz * dz).sqrt();
    if length < GEOMETRY_EPS {
        return Err(FrameError::InvalidGeometry(format!(
            "zero-length member between {:?} and {:?}",
            i_node, j_node
        )));
    }

    let x = [dx / length, dy / length, dz / length];

    let (y, z) = if x[0].abs() < GEOMETRY_EPS && x[2].abs() < GEOMETRY_EPS {
        // Vertical
        if x[1] > 0.0 {
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        } else {
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0])
        }
    } else if dy.abs() < GEOMETRY_EPS {
        // Horizontal
        let y = [0.0, 1.0, 0.0];
        (y, normalize(cross(&x, &y)))
    } else {
        // Inclined: project x onto the global XZ plane
        let proj = [dx, 0.0, dz];
        let z = if x[1] > 0.0 {
            normalize(cross(&proj, &x))
        } else {
            normalize(cross(&x, &proj))
        };
        (normalize(cross(&z, &x)), z)
    };

    let (y, z) = if rotation.abs() > GEOMETRY_EPS {
        let (s, c) = rotation.sin_cos();
        (
            [
                y[0] * c + z[0] * s,
                y[1] * c + z[1] * s,
                y[2] * c + z[2] * s,
            ],
            [
                -y[0] * s + z[0] * c,
                -y[1] * s + z[1] * c,
                -y[2] * s + z[2] * c,
            ],
        )
    } else {
        (y, z)
    };

    Ok([x, y, z])
}

/// 3x3 direction cosine matrix with the local axes as rows
pub fn rotation_matrix(axes: &Triad) -> FrameResult<MatrixDense> {
    let mut r = [0.0; 9];
    for (row, axis) in axes.iter().enumerate() {
        r[row * 3..row * 3 + 3].copy_from_slice(axis);
    }
    MatrixDense::from_row_slice(3, 3, &r)
}

/// Global-to-local transformation for a member with `dofs_per_node` DOFs at each of its two nodes
///
/// Replicates the 3x3 rotation along the diagonal: 2 blocks for a truss
/// element, 4 for a frame element.
pub fn transformation_matrix(axes: &Triad, dofs_per_node: usize) -> FrameResult<MatrixDense> {
    rotation_matrix(axes)?.block_diagonal(2 * dofs_per_node / 3)
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
///
/// # Returns
/// 12x12 local stiffness matrix ordered [u, v, w, rx, ry, rz] at i then j
pub fn frame_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> FrameResult<MatrixDense> {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    MatrixDense::from_row_slice(12, 12, &data)
}

/// Compute the local stiffness matrix for a 2-node truss element
///
/// 6x6, ordered [u, v, w] at i then j. Only the axial terms are non-zero.
pub fn truss_local_stiffness(e: f64, a: f64, length: f64) -> FrameResult<MatrixDense> {
    let ea_l = e * a / length;
    let mut k = MatrixDense::zeros(6, 6)?;
    k[(0, 0)] = ea_l;
    k[(0, 3)] = -ea_l;
    k[(3, 0)] = -ea_l;
    k[(3, 3)] = ea_l;
    Ok(k)
}

/// Rotate a local element matrix into global coordinates: `T^T * K_local * T`
pub fn to_global(k_local: &MatrixDense, t: &MatrixDense) -> FrameResult<MatrixDense> {
    t.transpose().mul(k_local)?.mul(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transformation_matrix_horizontal() {
        let axes = local_axes(&[0.0, 0.0, 0.0], &[10.0, 0.0, 0.0], 0.0).unwrap();
        let t = transformation_matrix(&axes, 6).unwrap();

        // local x = global X, local y = global Y, local z = global Z
        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(11, 11)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let axes = local_axes(&[0.0, 0.0, 0.0], &[0.0, 10.0, 0.0], 0.0).unwrap();
        let t = transformation_matrix(&axes, 6).unwrap();

        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-10);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inclined_axes_orthonormal() {
        let axes = local_axes(&[0.0, 0.0, 0.0], &[3.0, 4.0, 12.0], 0.3).unwrap();
        for a in 0..3 {
            for b in 0..3 {
                let dot: f64 = (0..3).map(|k| axes[a][k] * axes[b][k]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-12);
            }
        }
        // z stays horizontal before roll is applied
        let unrolled = local_axes(&[0.0, 0.0, 0.0], &[3.0, 4.0, 12.0], 0.0).unwrap();
        assert_relative_eq!(unrolled[2][1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_rejected() {
        let result = local_axes(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], 0.0);
        assert!(matches!(result, Err(FrameError::InvalidGeometry(_))));
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = frame_local_stiffness(200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5, 10.0).unwrap();
        assert!(k.is_symmetric(1e-14));
    }

    #[test]
    fn test_truss_global_stiffness_along_axis() {
        let axes = local_axes(&[0.0, 0.0, 0.0], &[0.0, 0.0, 2.0], 0.0).unwrap();
        let t = transformation_matrix(&axes, 3).unwrap();
        let k = to_global(&truss_local_stiffness(100.0, 1.0, 2.0).unwrap(), &t).unwrap();

        assert_relative_eq!(k[(2, 2)], 50.0, epsilon = 1e-12);
        assert_relative_eq!(k[(2, 5)], -50.0, epsilon = 1e-12);
        assert_relative_eq!(k[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(k[(1, 1)], 0.0, epsilon = 1e-12);
    }
}
