//! Node element - a merged point in 3D space

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable index of a node in its structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A 3D node in the structure
///
/// Nodes are created by the structure when members are inserted. Two
/// positions closer than the structure's node tolerance share one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,

    pub(crate) id: NodeId,

    /// Restrained axes [DX, DY, DZ, RX, RY, RZ]
    pub(crate) fixity: [bool; 6],

    /// Displacement results by load case
    #[serde(skip)]
    pub(crate) displacements: HashMap<String, [f64; 6]>,

    /// Reaction forces by load case
    #[serde(skip)]
    pub(crate) reactions: HashMap<String, [f64; 6]>,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: [f64; 3]) -> Self {
        Self {
            x: position[0],
            y: position[1],
            z: position[2],
            id,
            fixity: [false; 6],
            displacements: HashMap::new(),
            reactions: HashMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Restrained axes [DX, DY, DZ, RX, RY, RZ]
    pub fn fixity(&self) -> [bool; 6] {
        self.fixity
    }

    /// True if any axis is restrained
    pub fn is_supported(&self) -> bool {
        self.fixity.iter().any(|f| *f)
    }

    /// Euclidean distance to a point
    pub fn distance_to(&self, point: [f64; 3]) -> f64 {
        let dx = point[0] - self.x;
        let dy = point[1] - self.y;
        let dz = point[2] - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Get displacement for a load case
    /// Returns [DX, DY, DZ, RX, RY, RZ]
    pub fn displacement(&self, case: &str) -> Option<[f64; 6]> {
        self.displacements.get(case).copied()
    }

    /// Get reactions for a load case
    /// Returns [FX, FY, FZ, MX, MY, MZ]
    pub fn reaction(&self, case: &str) -> Option<[f64; 6]> {
        self.reactions.get(case).copied()
    }

    pub(crate) fn clear_results(&mut self, case: &str) {
        self.displacements.remove(case);
        self.reactions.remove(case);
    }
}
