//! Tolerance-aware node lookup
//!
//! Positions are bucketed on a uniform grid whose cell edge equals the merge
//! tolerance. Any point within the tolerance of a query lies in the query's
//! cell or one of its 26 neighbours.
//!
//! Cell indices are clamped to +/-2^52, so far-away points share edge cells
//! instead of overflowing the key.

use std::collections::HashMap;

use crate::elements::{Node, NodeId};

type CellKey = [i64; 3];

const MAX_CELL: f64 = 4_503_599_627_370_496.0; // 2^52

#[derive(Debug, Clone)]
pub(crate) struct NodeGrid {
    tolerance: f64,
    cells: HashMap<CellKey, Vec<NodeId>>,
}

impl NodeGrid {
    /// `tolerance` must be positive and finite
    pub(crate) fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cells: HashMap::new(),
        }
    }

    fn cell(&self, x: f64) -> i64 {
        (x / self.tolerance).floor().clamp(-MAX_CELL, MAX_CELL) as i64
    }

    fn key(&self, p: [f64; 3]) -> CellKey {
        [self.cell(p[0]), self.cell(p[1]), self.cell(p[2])]
    }

    /// Closest node within tolerance of `p`
    pub(crate) fn find(&self, p: [f64; 3], nodes: &[Node]) -> Option<NodeId> {
        let [cx, cy, cz] = self.key(p);
        let mut best: Option<(NodeId, f64)> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbour = [cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz)];
                    let Some(ids) = self.cells.get(&neighbour) else {
                        continue;
                    };
                    for &id in ids {
                        let d = nodes[id.index()].distance_to(p);
                        if d <= self.tolerance && best.map_or(true, |(_, bd)| d < bd) {
                            best = Some((id, d));
                        }
                    }
                }
            }
        }

        best.map(|(id, _)| id)
    }

    pub(crate) fn insert(&mut self, p: [f64; 3], id: NodeId) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(id);
    }
}
