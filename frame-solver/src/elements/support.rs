//! Support conditions

use serde::{Deserialize, Serialize};

/// Restrained axes at a node
///
/// Every restraint is a zero-displacement condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Support {
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Support {
    /// Create a support with no restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// All six axes restrained
    pub fn fixed() -> Self {
        Self::with_restraints(true, true, true, true, true, true)
    }

    /// Translations restrained, rotations free
    pub fn pinned() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Y translation restrained only
    pub fn roller_y() -> Self {
        Self::with_restraints(false, true, false, false, false, false)
    }

    /// Rotations restrained, translations free
    ///
    /// Needed at nodes that only bars connect to once a beam puts the
    /// structure on the six-DOF path.
    pub fn rotations_only() -> Self {
        Self::with_restraints(false, false, false, true, true, true)
    }

    /// Create a support with specific restraints
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self { dx, dy, dz, rx, ry, rz }
    }

    pub fn from_array(fixity: [bool; 6]) -> Self {
        Self::with_restraints(fixity[0], fixity[1], fixity[2], fixity[3], fixity[4], fixity[5])
    }

    /// Restraints as [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Union of two restraint sets
    pub fn combined(&self, other: &Support) -> Self {
        let a = self.as_array();
        let b = other.as_array();
        let mut out = [false; 6];
        for i in 0..6 {
            out[i] = a[i] || b[i];
        }
        Self::from_array(out)
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.as_array().iter().any(|r| *r)
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.as_array().iter().filter(|r| **r).count()
    }
}
