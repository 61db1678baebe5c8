//! Node lifecycle observers.
//!
//! The render host owns node construction and resizing; components that need
//! to react (the group panel clamping its minimum size, widget injection)
//! register an observer here instead of rewriting host methods.

use crate::graph::context::GraphContext;
use crate::graph::id::NodeId;
use crate::graph::node::NodeKind;

/// Observer invoked by [`GraphContext`] after node construction and resize.
pub trait NodeHooks: std::fmt::Debug + Send {
    /// Called after a node is inserted into the graph.
    fn node_created(&self, _graph: &mut GraphContext, _id: NodeId) {}

    /// Called after a node's size changes.
    fn node_resized(&self, _graph: &mut GraphContext, _id: NodeId) {}
}

/// Clamps group-editor nodes to a usable minimum size.
///
/// The minimum width depends on whether the navigate column is shown; the
/// panel re-registers the hook when that setting flips.
#[derive(Debug, Clone, Copy)]
pub struct PanelSizeHook {
    pub show_nav: bool,
}

impl PanelSizeHook {
    pub const MIN_HEIGHT: f32 = 100.0;

    pub fn new(show_nav: bool) -> Self {
        Self { show_nav }
    }

    pub fn min_width(&self) -> f32 {
        if self.show_nav {
            360.0
        } else {
            300.0
        }
    }

    fn clamp(&self, graph: &mut GraphContext, id: NodeId) {
        let min_w = self.min_width();
        if let Some(node) = graph.node_mut(id) {
            if node.kind != NodeKind::GroupEditor {
                return;
            }
            let next_w = node.size[0].max(min_w);
            let next_h = node.size[1].max(Self::MIN_HEIGHT);
            if next_w != node.size[0] || next_h != node.size[1] {
                node.size = [next_w, next_h];
                node.needs_redraw = true;
            }
        }
    }
}

impl NodeHooks for PanelSizeHook {
    fn node_created(&self, graph: &mut GraphContext, id: NodeId) {
        self.clamp(graph, id);
    }

    fn node_resized(&self, graph: &mut GraphContext, id: NodeId) {
        self.clamp(graph, id);
    }
}
