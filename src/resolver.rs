//! Selector value resolution.
//!
//! A preset switch's current index is not stored — it is computed from the
//! graph each tick. When the switch's selector input is wired, the value is
//! pulled from the upstream origin, walking backward through any relay nodes
//! in between. Every failure mode (dangling link, missing node, cycle, no
//! numeric widget) resolves to `None` so the caller can fall back to the
//! switch's local widget. Nothing here errors or panics.

use crate::graph::{GraphContext, GraphNode, LinkId, NodeId, NodeKind};
use std::collections::HashSet;

/// Name of the designated selector input on a preset switch node.
pub const SELECTOR_INPUT: &str = "preset_index";

/// Widget names probed for a numeric value, in priority order.
const PREFERRED_WIDGETS: [&str; 3] = ["preset_index", "value", "index"];

/// Resolve the numeric value feeding a node's selector input.
///
/// Returns `None` when the input is unconnected or the wiring cannot be
/// resolved to a finite number.
pub fn resolve_selector_value(graph: &GraphContext, node_id: NodeId) -> Option<f64> {
    let node = graph.node(node_id)?;
    let link = node.input(SELECTOR_INPUT)?.link?;

    let mut visited_links: HashSet<LinkId> = HashSet::new();
    let mut visited_nodes: HashSet<NodeId> = HashSet::new();
    resolve_from_link(graph, link, &mut visited_links, &mut visited_nodes)
}

fn resolve_from_link(
    graph: &GraphContext,
    link_id: LinkId,
    visited_links: &mut HashSet<LinkId>,
    visited_nodes: &mut HashSet<NodeId>,
) -> Option<f64> {
    if !visited_links.insert(link_id) {
        tracing::debug!(link = ?link_id, "selector resolution revisited a link, treating as unresolved");
        return None;
    }

    let link = graph.link(link_id)?;
    let source = graph.node(link.origin)?;
    if !visited_nodes.insert(source.id) {
        tracing::debug!(node = %source.id, "selector resolution revisited a node, treating as unresolved");
        return None;
    }

    // Relays are transparent: continue upstream through their first input.
    if source.kind == NodeKind::Relay {
        let upstream = source.inputs.first().and_then(|i| i.link)?;
        return resolve_from_link(graph, upstream, visited_links, visited_nodes);
    }

    read_numeric_widget(source)
}

/// First finite numeric widget value: preferred names in priority order,
/// then any widget whose value coerces.
fn read_numeric_widget(node: &GraphNode) -> Option<f64> {
    for name in PREFERRED_WIDGETS {
        if let Some(n) = node.widget_value(name).and_then(|v| v.as_finite_number()) {
            return Some(n);
        }
    }
    node.widgets.iter().find_map(|w| w.value.as_finite_number())
}

/// Clamp an arbitrary resolved value to a usable preset index.
pub fn normalize_index(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.floor().max(0.0) as u32
}
