//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Linear elastic material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Density in kg/m³
    #[serde(default)]
    pub rho: f64,
}

impl Material {
    pub fn new(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        Self { e, g, nu, rho }
    }

    /// Isotropic material with G = E / (2 (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self::new(e, g, nu, rho)
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self::new(200e9, 77e9, 0.3, 7850.0)
    }

    /// Aluminium 6061-T6
    pub fn aluminum() -> Self {
        Self::new(68.9e9, 26e9, 0.33, 2700.0)
    }

    /// Moduli must be positive; `g` only matters for beams
    pub fn validate(&self, needs_shear: bool) -> FrameResult<()> {
        if !(self.e > 0.0 && self.e.is_finite()) {
            return Err(FrameError::Configuration(format!(
                "elastic modulus must be positive, got {}",
                self.e
            )));
        }
        if needs_shear && !(self.g > 0.0 && self.g.is_finite()) {
            return Err(FrameError::Configuration(format!(
                "shear modulus must be positive, got {}",
                self.g
            )));
        }
        Ok(())
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
