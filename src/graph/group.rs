//! Node groups: spatial clusters of nodes toggled as one unit.
//!
//! Membership is visual, not structural — a node belongs to a group when its
//! position falls inside the group's rectangle, and is recomputed on demand
//! rather than stored.

use crate::graph::id::{GroupId, NodeId};
use serde::{Deserialize, Serialize};

/// A rectangular cluster of nodes on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeGroup {
    pub id: GroupId,
    pub title: String,
    /// Canvas color, matched against the panel's color filter.
    pub color: Option<String>,
    pub pos: [f32; 2],
    pub size: [f32; 2],
}

impl NodeGroup {
    pub fn new(id: GroupId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: None,
            pos: [0.0, 0.0],
            size: [300.0, 200.0],
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = [x, y];
        self
    }

    pub fn sized(mut self, w: f32, h: f32) -> Self {
        self.size = [w, h];
        self
    }

    pub fn colored(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Bounding-box containment test for a node position.
    pub fn contains(&self, pos: [f32; 2]) -> bool {
        pos[0] >= self.pos[0]
            && pos[0] <= self.pos[0] + self.size[0]
            && pos[1] >= self.pos[1]
            && pos[1] <= self.pos[1] + self.size[1]
    }

    /// Recompute the member node ids from the given node positions.
    pub fn members<'a, I>(&self, nodes: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = (&'a NodeId, [f32; 2])>,
    {
        nodes
            .into_iter()
            .filter(|(_, pos)| self.contains(*pos))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment() {
        let group = NodeGroup::new(GroupId(0), "loaders")
            .at(100.0, 100.0)
            .sized(200.0, 100.0);

        assert!(group.contains([150.0, 150.0]));
        assert!(group.contains([100.0, 100.0])); // edge inclusive
        assert!(group.contains([300.0, 200.0])); // far corner inclusive
        assert!(!group.contains([99.0, 150.0]));
        assert!(!group.contains([150.0, 201.0]));
    }
}
