//! The preset engine: capture, apply, and automatic switching.
//!
//! Capture walks every live node and snapshots its execution mode; apply
//! writes a snapshot back onto whatever subset of those nodes still exists.
//! The engine never treats a drifted graph as an error — missing nodes are
//! counted and reported per the store's policy, and partial application is
//! success.
//!
//! The "current" preset is never stored. It is recomputed from the selector
//! wiring (or the local widget) on every tick, and the engine applies a
//! preset exactly when that computed value moves away from the last-applied
//! marker. External rewiring therefore switches presets with no explicit
//! user action.

use crate::graph::{GraphContext, NodeId, NodeKind, WidgetValue};
use crate::preset::store::{
    default_name, IndexPolicy, MissingNodePolicy, NodeState, Preset,
};
use crate::resolver::{normalize_index, resolve_selector_value, SELECTOR_INPUT};
use std::collections::HashMap;

/// Result of applying a preset to the live graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot was written onto the graph. `missing` counts snapshot
    /// entries whose node no longer exists; partial application is success.
    Applied { applied: usize, missing: usize },
    /// No preset is stored at the requested index; nothing was touched.
    NotFound,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. })
    }
}

/// Orchestrates snapshots between the preset store and the live graph.
#[derive(Debug, Default)]
pub struct PresetEngine {
    /// Last index applied per switch node, used to detect selector movement.
    last_applied: HashMap<NodeId, u32>,
}

impl PresetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Snapshot operations ──

    /// Snapshot every node's execution mode into the preset at `index`,
    /// overwriting any existing snapshot there but preserving its name.
    /// Returns the number of nodes captured.
    pub fn capture(&self, graph: &mut GraphContext, index: u32) -> usize {
        let node_states: std::collections::BTreeMap<NodeId, NodeState> = graph
            .nodes()
            .map(|node| (node.id, NodeState::of(node.mode)))
            .collect();
        let captured = node_states.len();

        let store = graph.preset_store_mut();
        let name = store
            .get(index)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| default_name(index));
        let mut preset = Preset::named(name);
        preset.node_states = node_states;
        store.put(index, preset);

        graph.mark_dirty();
        tracing::info!(index, captured, "recorded preset");
        captured
    }

    /// Write the snapshot at `index` back onto the graph.
    pub fn apply(&self, graph: &mut GraphContext, index: u32) -> ApplyOutcome {
        let store = graph.preset_store_mut();
        let options = store.options;
        let Some(preset) = store.get(index) else {
            if options.index_out_of_range == IndexPolicy::Warn {
                tracing::warn!(index, "preset not found");
            }
            return ApplyOutcome::NotFound;
        };
        let states: Vec<(NodeId, NodeState)> = preset
            .node_states
            .iter()
            .map(|(&id, &state)| (id, state))
            .collect();

        let mut applied = 0;
        let mut missing = 0;
        for (node_id, state) in states {
            match graph.node_mut(node_id) {
                Some(node) => {
                    if let Some(mode) = state.mode {
                        node.mode = mode;
                        node.needs_redraw = true;
                    }
                    applied += 1;
                }
                None => missing += 1,
            }
        }

        if missing > 0 && options.on_missing_node == MissingNodePolicy::Skip {
            tracing::warn!(index, missing, "preset skipped missing node(s)");
        }

        graph.mark_dirty();
        tracing::debug!(index, applied, missing, "applied preset");
        ApplyOutcome::Applied { applied, missing }
    }

    /// Apply `index` and move `node`'s last-applied marker to it, syncing the
    /// local index widget when the selector input is unlinked.
    pub fn switch_to(
        &mut self,
        graph: &mut GraphContext,
        node: NodeId,
        index: u32,
    ) -> ApplyOutcome {
        if !self.is_selector_linked(graph, node) {
            if let Some(switch) = graph.node_mut(node) {
                switch.set_widget_value(SELECTOR_INPUT, WidgetValue::Number(index as f64));
            }
        }
        let outcome = self.apply(graph, index);
        self.last_applied.insert(node, index);
        outcome
    }

    // ── Selector state ──

    /// Whether the switch node's selector input is wired upstream.
    pub fn is_selector_linked(&self, graph: &GraphContext, node: NodeId) -> bool {
        graph
            .node(node)
            .and_then(|n| n.input(SELECTOR_INPUT))
            .is_some_and(|slot| slot.link.is_some())
    }

    /// The switch node's current preset index: the resolved upstream value
    /// when linked, the local widget otherwise, 0 as the final fallback.
    pub fn current_index(&self, graph: &GraphContext, node: NodeId) -> u32 {
        if let Some(value) = resolve_selector_value(graph, node) {
            return normalize_index(value);
        }
        graph
            .node(node)
            .and_then(|n| n.widget_value(SELECTOR_INPUT))
            .and_then(|v| v.as_finite_number())
            .map(normalize_index)
            .unwrap_or(0)
    }

    pub fn last_applied(&self, node: NodeId) -> Option<u32> {
        self.last_applied.get(&node).copied()
    }

    // ── Autodetection ──

    /// One autodetection pass: for every preset switch node, recompute the
    /// current index and apply it if it moved since the last application.
    /// Idempotent; a redundant tick is a no-op. Returns the number of
    /// switches that applied a preset this pass.
    pub fn on_tick(&mut self, graph: &mut GraphContext) -> usize {
        let switches: Vec<NodeId> = graph
            .nodes()
            .filter(|n| n.kind == NodeKind::PresetSwitch)
            .map(|n| n.id)
            .collect();

        let mut applied = 0;
        for node in switches {
            let current = self.current_index(graph, node);
            if self.last_applied.get(&node) != Some(&current) {
                self.apply(graph, current);
                self.last_applied.insert(node, current);
                applied += 1;
            }
        }
        applied
    }

    // ── User actions ──

    /// Capture at the next available index and switch to it.
    pub fn add_preset(&mut self, graph: &mut GraphContext, node: NodeId) -> u32 {
        let index = graph.preset_store_mut().next_available_index();
        self.capture(graph, index);
        self.switch_to(graph, node, index);
        index
    }

    /// Overwrite the snapshot at the current index. Returns that index.
    pub fn record_current(&mut self, graph: &mut GraphContext, node: NodeId) -> u32 {
        let index = self.current_index(graph, node);
        self.capture(graph, index);
        index
    }

    /// Delete the preset at the current index, reindex, and fall back to the
    /// nearest remaining index. Returns the fallback index, or None when the
    /// current index had no preset.
    pub fn delete_selected(&mut self, graph: &mut GraphContext, node: NodeId) -> Option<u32> {
        let index = self.current_index(graph, node);
        if !graph.preset_store_mut().delete(index) {
            return None;
        }
        let indexes = graph.preset_store_mut().list_indexes();
        let fallback = indexes.last().map(|&max| index.min(max)).unwrap_or(0);
        if !self.is_selector_linked(graph, node) {
            self.switch_to(graph, node, fallback);
        }
        Some(fallback)
    }

    /// Switch to the cyclic predecessor of the current index.
    pub fn prev(&mut self, graph: &mut GraphContext, node: NodeId) -> u32 {
        let current = self.current_index(graph, node);
        let prev = graph.preset_store_mut().prev(current);
        self.switch_to(graph, node, prev);
        prev
    }

    /// Switch to the cyclic successor of the current index.
    pub fn next(&mut self, graph: &mut GraphContext, node: NodeId) -> u32 {
        let current = self.current_index(graph, node);
        let next = graph.preset_store_mut().next(current);
        self.switch_to(graph, node, next);
        next
    }

    /// Rename the preset at the current index.
    pub fn rename_current(&mut self, graph: &mut GraphContext, node: NodeId, name: &str) -> bool {
        let index = self.current_index(graph, node);
        graph.preset_store_mut().rename(index, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphNode, NodeId, Widget};
    use crate::mode::Mode;

    fn graph_with_switch() -> (GraphContext, NodeId, Vec<NodeId>) {
        let mut graph = GraphContext::new();
        let nodes: Vec<NodeId> = (0..3)
            .map(|i| graph.add_node(format!("node{i}"), NodeKind::Plain))
            .collect();
        let switch = graph.insert_node(
            GraphNode::new(NodeId::INVALID, "switch", NodeKind::PresetSwitch)
                .with_widget(Widget::number("preset_index", 0.0))
                .with_input(SELECTOR_INPUT, None),
        );
        (graph, switch, nodes)
    }

    #[test]
    fn test_capture_snapshots_all_nodes() {
        let (mut graph, switch, nodes) = graph_with_switch();
        graph.node_mut(nodes[1]).unwrap().mode = Mode::Bypassed;

        let engine = PresetEngine::new();
        let captured = engine.capture(&mut graph, 0);
        assert_eq!(captured, 4); // 3 plain nodes + the switch itself

        let preset = graph.preset_store().unwrap().get(0).unwrap();
        assert_eq!(
            preset.node_states.get(&nodes[1]).unwrap().mode,
            Some(Mode::Bypassed)
        );
        assert_eq!(
            preset.node_states.get(&switch).unwrap().mode,
            Some(Mode::Enabled)
        );
    }

    #[test]
    fn test_capture_preserves_existing_name() {
        let (mut graph, _switch, _nodes) = graph_with_switch();
        let engine = PresetEngine::new();
        engine.capture(&mut graph, 0);
        graph.preset_store_mut().rename(0, "My Setup");
        engine.capture(&mut graph, 0);
        assert_eq!(graph.preset_store().unwrap().get(0).unwrap().name, "My Setup");
    }

    #[test]
    fn test_apply_missing_preset_touches_nothing() {
        let (mut graph, _switch, nodes) = graph_with_switch();
        graph.node_mut(nodes[0]).unwrap().mode = Mode::Disabled;

        let engine = PresetEngine::new();
        assert_eq!(engine.apply(&mut graph, 9), ApplyOutcome::NotFound);
        assert_eq!(graph.node(nodes[0]).unwrap().mode, Mode::Disabled);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (mut graph, _switch, nodes) = graph_with_switch();
        graph.node_mut(nodes[0]).unwrap().mode = Mode::Bypassed;
        let engine = PresetEngine::new();
        engine.capture(&mut graph, 0);

        graph.node_mut(nodes[0]).unwrap().mode = Mode::Enabled;
        engine.apply(&mut graph, 0);
        let once: Vec<Mode> = nodes.iter().map(|&n| graph.node(n).unwrap().mode).collect();
        engine.apply(&mut graph, 0);
        let twice: Vec<Mode> = nodes.iter().map(|&n| graph.node(n).unwrap().mode).collect();
        assert_eq!(once, twice);
        assert_eq!(graph.node(nodes[0]).unwrap().mode, Mode::Bypassed);
    }

    #[test]
    fn test_partial_apply_tolerates_missing_nodes() {
        let (mut graph, _switch, nodes) = graph_with_switch();
        for &n in &nodes {
            graph.node_mut(n).unwrap().mode = Mode::Disabled;
        }
        let engine = PresetEngine::new();
        engine.capture(&mut graph, 0);

        graph.remove_node(nodes[1]);
        for &n in [nodes[0], nodes[2]].iter() {
            graph.node_mut(n).unwrap().mode = Mode::Enabled;
        }

        let outcome = engine.apply(&mut graph, 0);
        assert_eq!(outcome, ApplyOutcome::Applied { applied: 3, missing: 1 });
        assert_eq!(graph.node(nodes[0]).unwrap().mode, Mode::Disabled);
        assert_eq!(graph.node(nodes[2]).unwrap().mode, Mode::Disabled);
    }

    #[test]
    fn test_switch_to_syncs_widget_only_when_unlinked() {
        let (mut graph, switch, _nodes) = graph_with_switch();
        let mut engine = PresetEngine::new();
        engine.capture(&mut graph, 0);
        engine.capture(&mut graph, 1);

        engine.switch_to(&mut graph, switch, 1);
        assert_eq!(
            graph.node(switch).unwrap().widget_value(SELECTOR_INPUT),
            Some(&WidgetValue::Number(1.0))
        );

        // wire the selector; the widget must no longer be written
        let source = graph.insert_node(
            GraphNode::new(NodeId::INVALID, "int", NodeKind::Plain)
                .with_widget(Widget::number("value", 0.0)),
        );
        graph.connect(source, switch, SELECTOR_INPUT).unwrap();
        engine.switch_to(&mut graph, switch, 0);
        assert_eq!(
            graph.node(switch).unwrap().widget_value(SELECTOR_INPUT),
            Some(&WidgetValue::Number(1.0))
        );
    }

    #[test]
    fn test_autodetect_applies_on_selector_change() {
        let (mut graph, switch, nodes) = graph_with_switch();
        let mut engine = PresetEngine::new();

        // preset 0: all enabled; preset 1: all bypassed
        engine.capture(&mut graph, 0);
        for &n in &nodes {
            graph.node_mut(n).unwrap().mode = Mode::Bypassed;
        }
        engine.capture(&mut graph, 1);

        let source = graph.insert_node(
            GraphNode::new(NodeId::INVALID, "int", NodeKind::Plain)
                .with_widget(Widget::number("value", 0.0)),
        );
        graph.connect(source, switch, SELECTOR_INPUT).unwrap();

        assert_eq!(engine.on_tick(&mut graph), 1);
        assert_eq!(graph.node(nodes[0]).unwrap().mode, Mode::Enabled);
        // same value again: nothing to do
        assert_eq!(engine.on_tick(&mut graph), 0);

        // external edit moves the upstream value
        graph
            .node_mut(source)
            .unwrap()
            .set_widget_value("value", WidgetValue::Number(1.0));
        assert_eq!(engine.on_tick(&mut graph), 1);
        assert_eq!(graph.node(nodes[0]).unwrap().mode, Mode::Bypassed);
    }

    #[test]
    fn test_delete_selected_falls_back_to_nearest() {
        let (mut graph, switch, _nodes) = graph_with_switch();
        let mut engine = PresetEngine::new();
        for i in 0..3 {
            engine.capture(&mut graph, i);
        }

        engine.switch_to(&mut graph, switch, 2);
        let fallback = engine.delete_selected(&mut graph, switch);
        assert_eq!(fallback, Some(1)); // index 2 gone, max remaining is 1
        assert_eq!(graph.preset_store().unwrap().list_indexes(), vec![0, 1]);

        engine.switch_to(&mut graph, switch, 0);
        assert_eq!(engine.delete_selected(&mut graph, switch), Some(0));
        assert_eq!(engine.delete_selected(&mut graph, switch), Some(0));
        assert_eq!(engine.delete_selected(&mut graph, switch), None);
    }

    #[test]
    fn test_add_preset_switches_to_new_index() {
        let (mut graph, switch, _nodes) = graph_with_switch();
        let mut engine = PresetEngine::new();
        assert_eq!(engine.add_preset(&mut graph, switch), 0);
        assert_eq!(engine.add_preset(&mut graph, switch), 1);
        assert_eq!(engine.current_index(&graph, switch), 1);
        assert_eq!(engine.last_applied(switch), Some(1));
    }
}
