//! Point loads at structure nodes

use serde::{Deserialize, Serialize};

use super::NodeLoad;
use crate::elements::NodeId;

/// A concentrated load at a node of the structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    pub node: NodeId,
    pub load: NodeLoad,
}

impl PointLoad {
    pub fn new(node: NodeId, load: NodeLoad) -> Self {
        Self { node, load }
    }
}
