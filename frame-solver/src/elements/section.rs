//! Cross-section properties

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Cross-section properties for bars and beams
///
/// Bars only read `a`. Beams read all four; bending in the local x-y plane
/// uses `iz`, bending in the local x-z plane uses `iy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴
    #[serde(default)]
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    #[serde(default)]
    pub iz: f64,
    /// Torsional constant in m⁴
    #[serde(default)]
    pub j: f64,
}

impl Section {
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Area-only section for axial bars
    pub fn axial(a: f64) -> Self {
        Self::new(a, 0.0, 0.0, 0.0)
    }

    /// Solid rectangle, `depth` measured along local y
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iz = width * depth.powi(3) / 12.0;
        let iy = depth * width.powi(3) / 12.0;

        // Saint-Venant approximation
        let (long, short) = if width > depth { (width, depth) } else { (depth, width) };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self::new(a, iy, iz, j)
    }

    /// Solid circle
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        Self::new(a, i, i, 2.0 * i)
    }

    /// True if every property a beam needs is positive
    pub fn has_bending_properties(&self) -> bool {
        self.a > 0.0 && self.iy > 0.0 && self.iz > 0.0 && self.j > 0.0
    }

    pub fn validate(&self, needs_bending: bool) -> FrameResult<()> {
        if !(self.a > 0.0 && self.a.is_finite()) {
            return Err(FrameError::Configuration(format!(
                "section area must be positive, got {}",
                self.a
            )));
        }
        if needs_bending && !self.has_bending_properties() {
            return Err(FrameError::Configuration(format!(
                "beam section needs positive iy, iz and j, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        assert_relative_eq!(section.a, 0.15);
        assert_relative_eq!(section.iz, 0.3 * 0.5_f64.powi(3) / 12.0);
        assert_relative_eq!(section.iy, 0.5 * 0.3_f64.powi(3) / 12.0);
        assert!(section.has_bending_properties());
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.5);
        assert_relative_eq!(section.a, std::f64::consts::PI * 0.0625);
        assert_relative_eq!(section.iy, section.iz);
    }

    #[test]
    fn test_axial_section_has_no_bending() {
        let section = Section::axial(0.01);
        assert!(!section.has_bending_properties());
        assert!(section.validate(false).is_ok());
        assert!(section.validate(true).is_err());
        assert!(Section::axial(0.0).validate(false).is_err());
    }
}
