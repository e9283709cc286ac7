//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

/// Force and moment components at a node, in global axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLoad {
    /// Force in X direction (N)
    pub fx: f64,
    /// Force in Y direction (N)
    pub fy: f64,
    /// Force in Z direction (N)
    pub fz: f64,
    /// Moment about X axis (N·m)
    pub mx: f64,
    /// Moment about Y axis (N·m)
    pub my: f64,
    /// Moment about Z axis (N·m)
    pub mz: f64,
}

impl NodeLoad {
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }

    /// Create a force-only node load
    pub fn force(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only node load
    pub fn moment(mx: f64, my: f64, mz: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mx, my, mz)
    }

    pub fn fx(value: f64) -> Self {
        Self::force(value, 0.0, 0.0)
    }

    pub fn fy(value: f64) -> Self {
        Self::force(0.0, value, 0.0)
    }

    pub fn fz(value: f64) -> Self {
        Self::force(0.0, 0.0, value)
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    pub fn has_moment(&self) -> bool {
        self.mx != 0.0 || self.my != 0.0 || self.mz != 0.0
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        let a = self.as_array();
        Self::new(
            a[0] * factor,
            a[1] * factor,
            a[2] * factor,
            a[3] * factor,
            a[4] * factor,
            a[5] * factor,
        )
    }
}
