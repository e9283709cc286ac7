//! Load cases

use serde::{Deserialize, Serialize};

use super::{DisplacementBound, NodeLoad, PointLoad};
use crate::elements::NodeId;
use crate::error::{FrameError, FrameResult};

/// A named set of point loads and displacement bounds
///
/// The name is the identity key within a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Name of the load case
    pub name: String,
    /// Description of the load case
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub point_loads: Vec<PointLoad>,
    #[serde(default)]
    pub displacement_bounds: Vec<DisplacementBound>,
}

impl LoadCase {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            point_loads: Vec::new(),
            displacement_bounds: Vec::new(),
        }
    }

    /// Create a load case with description
    pub fn with_description(name: &str, description: &str) -> Self {
        Self {
            description: Some(description.to_string()),
            ..Self::new(name)
        }
    }

    pub fn dead() -> Self {
        Self::with_description("Dead", "Dead loads (self-weight and permanent loads)")
    }

    /// Names must contain at least one non-whitespace character
    pub fn validate_name(name: &str) -> FrameResult<()> {
        if name.trim().is_empty() {
            return Err(FrameError::InvalidLoadCaseName(name.to_string()));
        }
        Ok(())
    }

    /// Append a load; loads at the same node add up
    pub fn add_load(&mut self, node: NodeId, load: NodeLoad) {
        self.point_loads.push(PointLoad::new(node, load));
    }

    pub fn add_bound(&mut self, bound: DisplacementBound) {
        self.displacement_bounds.push(bound);
    }

    /// Sum of every load applied at `node`
    pub fn total_at(&self, node: NodeId) -> [f64; 6] {
        let mut total = [0.0; 6];
        for pl in self.point_loads.iter().filter(|pl| pl.node == node) {
            for (t, v) in total.iter_mut().zip(pl.load.as_array()) {
                *t += v;
            }
        }
        total
    }

    /// Nodes referenced by loads or bounds
    pub(crate) fn referenced_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.point_loads
            .iter()
            .map(|pl| pl.node)
            .chain(self.displacement_bounds.iter().map(|b| b.node))
    }
}
