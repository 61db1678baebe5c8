//! Test data builders for creating test graphs

use flowstate::graph::{GraphContext, GraphNode, GroupId, NodeGroup, NodeId, NodeKind, Widget};

/// Builder for test graphs with groups, member nodes, and a preset switch.
pub struct GraphBuilder {
    graph: GraphContext,
    group_row: f32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: GraphContext::new(),
            group_row: 0.0,
        }
    }

    /// Add a group with `members` plain nodes placed inside it. Groups stack
    /// vertically in insertion order so position sorting matches it.
    pub fn group(mut self, title: &str, members: usize) -> Self {
        let y = self.group_row;
        self.group_row += 300.0;
        self.graph.add_group(
            NodeGroup::new(GroupId::INVALID, title)
                .at(0.0, y)
                .sized(400.0, 250.0),
        );
        for i in 0..members {
            self.graph.insert_node(
                GraphNode::new(NodeId::INVALID, format!("{title} {i}"), NodeKind::Plain)
                    .at(40.0 + i as f32 * 120.0, y + 60.0),
            );
        }
        self
    }

    /// Add a free-standing plain node outside any group.
    pub fn node(mut self, title: &str) -> Self {
        self.graph.insert_node(
            GraphNode::new(NodeId::INVALID, title, NodeKind::Plain).at(2000.0, 2000.0),
        );
        self
    }

    /// Add a preset switch node with a local index widget and an unwired
    /// selector input, placed outside any group.
    pub fn switch(mut self) -> Self {
        self.graph.insert_node(
            GraphNode::new(NodeId::INVALID, "Preset Switch", NodeKind::PresetSwitch)
                .at(2000.0, 0.0)
                .with_widget(Widget::number("preset_index", 0.0))
                .with_input("preset_index", None),
        );
        self
    }

    pub fn build(self) -> GraphContext {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The first preset switch node in the graph.
pub fn switch_id(graph: &GraphContext) -> NodeId {
    graph
        .nodes()
        .find(|n| n.kind == NodeKind::PresetSwitch)
        .map(|n| n.id)
        .expect("graph has a preset switch node")
}

/// The id of the group with the given title.
pub fn group_id(graph: &GraphContext, title: &str) -> GroupId {
    graph
        .groups()
        .find(|g| g.title == title)
        .map(|g| g.id)
        .expect("graph has the requested group")
}
