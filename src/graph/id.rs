//! Identity types for the graph model.
//!
//! All IDs are newtypes over `u32`. Node ids double as keys in persisted
//! preset snapshots, so `NodeId` serializes transparently as its inner
//! integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a node in a [`GraphContext`](crate::graph::GraphContext).
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "NodeId(INVALID)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identifier of a link between an output and an input slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u32);

impl LinkId {
    pub const INVALID: LinkId = LinkId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Debug for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "LinkId(INVALID)")
        } else {
            write!(f, "LinkId({})", self.0)
        }
    }
}

/// Identifier of a node group.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    pub const INVALID: GroupId = GroupId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "GroupId(INVALID)")
        } else {
            write!(f, "GroupId({})", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId(42);
        assert!(id.is_valid());
        assert!(!NodeId::INVALID.is_valid());
    }

    #[test]
    fn test_node_id_serializes_as_integer() {
        let json = serde_json::to_string(&NodeId(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_node_id_as_map_key() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(NodeId(3), "three");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "{\"3\":\"three\"}");
        let back: BTreeMap<NodeId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&NodeId(3)).map(String::as_str), Some("three"));
    }

    #[test]
    fn test_link_and_group_id() {
        assert!(LinkId(5).is_valid());
        assert!(!LinkId::INVALID.is_valid());
        assert!(GroupId(0).is_valid());
        assert!(!GroupId::INVALID.is_valid());
    }
}
