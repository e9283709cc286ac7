//! Displacement limits checked after a solve

use serde::{Deserialize, Serialize};

use crate::dof::Axis;
use crate::elements::NodeId;

/// Allowed range for one displacement component of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementBound {
    pub node: NodeId,
    pub axis: Axis,
    pub lower: f64,
    pub upper: f64,
}

impl DisplacementBound {
    pub fn new(node: NodeId, axis: Axis, lower: f64, upper: f64) -> Self {
        Self { node, axis, lower, upper }
    }

    /// |u| <= limit
    pub fn symmetric(node: NodeId, axis: Axis, limit: f64) -> Self {
        let limit = limit.abs();
        Self::new(node, axis, -limit, limit)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}
