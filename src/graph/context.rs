//! The graph context: the single owner of nodes, links, groups, and the
//! preset store.
//!
//! This models the host graph's interface contract: enumerable live nodes
//! with stable ids, a mutable per-node mode field, lookup by id, and a
//! generic extra-data bag the preset store round-trips through so that it
//! survives the host's own save/load. There are no hidden statics — every
//! engine operation takes the context it mutates.

use crate::error::{FlowStateError, Result};
use crate::graph::group::NodeGroup;
use crate::graph::hooks::NodeHooks;
use crate::graph::id::{GroupId, LinkId, NodeId};
use crate::graph::node::{GraphNode, NodeKind};
use crate::preset::PresetStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key under which the preset store lives in the graph's extra-data bag.
pub const STORE_KEY: &str = "workflow_state_presets";

/// A wire from an upstream node's output to some input slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    pub id: LinkId,
    pub origin: NodeId,
}

/// The live graph: nodes, links, groups, nested subgraphs, and extra data.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GraphContext {
    nodes: BTreeMap<NodeId, GraphNode>,
    links: BTreeMap<LinkId, GraphLink>,
    groups: BTreeMap<GroupId, NodeGroup>,
    /// One level of nested sub-graphs, unioned into group resolution when
    /// the panel is configured to show all graphs.
    #[serde(default)]
    pub subgraphs: Vec<GraphContext>,
    /// Generic key-value bag persisted by the host alongside the graph.
    #[serde(default)]
    pub extra: serde_json::Map<String, Value>,
    #[serde(skip)]
    next_node: u32,
    #[serde(skip)]
    next_link: u32,
    #[serde(skip)]
    next_group: u32,
    #[serde(skip)]
    store: Option<PresetStore>,
    #[serde(skip)]
    hooks: Vec<Box<dyn NodeHooks>>,
    #[serde(skip)]
    dirty: bool,
}

impl GraphContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Nodes ──

    /// Create a node and return its id. Lifecycle hooks run after insertion.
    pub fn add_node(&mut self, title: impl Into<String>, kind: NodeKind) -> NodeId {
        let id = self.alloc_node_id();
        self.insert_node(GraphNode::new(id, title, kind))
    }

    /// Insert a prebuilt node. An invalid id is replaced with a fresh one.
    pub fn insert_node(&mut self, mut node: GraphNode) -> NodeId {
        if !node.id.is_valid() {
            node.id = self.alloc_node_id();
        }
        let id = node.id;
        self.next_node = self.next_node.max(id.0.saturating_add(1));
        self.nodes.insert(id, node);
        self.run_hooks(|hook, graph| hook.node_created(graph, id));
        id
    }

    fn alloc_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(&id)
    }

    /// Remove a node. Links originating from it are left in place; consumers
    /// treat a dangling link as an unresolved reference.
    pub fn remove_node(&mut self, id: NodeId) -> Option<GraphNode> {
        let removed = self.nodes.remove(&id);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resize a node and run the resize hooks (the extension point the group
    /// panel uses to enforce its minimum size).
    pub fn set_node_size(&mut self, id: NodeId, size: [f32; 2]) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.size = size;
            node.needs_redraw = true;
        } else {
            return;
        }
        self.run_hooks(|hook, graph| hook.node_resized(graph, id));
    }

    // ── Links ──

    /// Create a link whose value originates at `origin`.
    pub fn add_link(&mut self, origin: NodeId) -> LinkId {
        let id = LinkId(self.next_link);
        self.next_link += 1;
        self.links.insert(id, GraphLink { id, origin });
        id
    }

    pub fn link(&self, id: LinkId) -> Option<&GraphLink> {
        self.links.get(&id)
    }

    /// Wire `origin`'s output into the named input slot of `target`.
    /// Returns the link id, or None when the target slot does not exist.
    pub fn connect(
        &mut self,
        origin: NodeId,
        target: NodeId,
        input_name: &str,
    ) -> Option<LinkId> {
        if !self.nodes.contains_key(&origin) {
            return None;
        }
        let link = self.add_link(origin);
        let node = self.nodes.get_mut(&target)?;
        let slot = node.inputs.iter_mut().find(|i| i.name == input_name)?;
        slot.link = Some(link);
        Some(link)
    }

    /// Rewire an existing input slot to a different link (or unwire it).
    pub fn set_input_link(&mut self, target: NodeId, input_name: &str, link: Option<LinkId>) {
        if let Some(node) = self.nodes.get_mut(&target) {
            if let Some(slot) = node.inputs.iter_mut().find(|i| i.name == input_name) {
                slot.link = link;
            }
        }
    }

    // ── Groups ──

    pub fn add_group(&mut self, mut group: NodeGroup) -> GroupId {
        if !group.id.is_valid() {
            group.id = GroupId(self.next_group);
        }
        let id = group.id;
        self.next_group = self.next_group.max(id.0.saturating_add(1));
        self.groups.insert(id, group);
        id
    }

    pub fn group(&self, id: GroupId) -> Option<&NodeGroup> {
        self.groups.get(&id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut NodeGroup> {
        self.groups.get_mut(&id)
    }

    pub fn remove_group(&mut self, id: GroupId) -> Option<NodeGroup> {
        self.groups.remove(&id)
    }

    pub fn groups(&self) -> impl Iterator<Item = &NodeGroup> {
        self.groups.values()
    }

    /// Recompute the spatial membership of a group.
    pub fn group_members(&self, id: GroupId) -> Vec<NodeId> {
        match self.groups.get(&id) {
            Some(group) => group.members(self.nodes.iter().map(|(id, n)| (id, n.pos))),
            None => Vec::new(),
        }
    }

    /// Look up a group by id across this graph and its subgraphs.
    pub fn find_group(&self, id: GroupId) -> Option<&NodeGroup> {
        self.groups
            .get(&id)
            .or_else(|| self.subgraphs.iter().find_map(|g| g.group(id)))
    }

    pub fn find_group_mut(&mut self, id: GroupId) -> Option<&mut NodeGroup> {
        if self.groups.contains_key(&id) {
            return self.groups.get_mut(&id);
        }
        self.subgraphs.iter_mut().find_map(|g| g.group_mut(id))
    }

    /// Membership of a group wherever it lives (this graph or a subgraph).
    pub fn find_group_members(&self, id: GroupId) -> Vec<NodeId> {
        if self.groups.contains_key(&id) {
            return self.group_members(id);
        }
        self.subgraphs
            .iter()
            .find(|g| g.group(id).is_some())
            .map(|g| g.group_members(id))
            .unwrap_or_default()
    }

    // ── Redraw flag ──

    /// Flag the canvas for redraw. The render layer consumes this.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── Lifecycle hooks ──

    /// Register an observer invoked after node creation and resize.
    pub fn add_hook(&mut self, hook: Box<dyn NodeHooks>) {
        self.hooks.push(hook);
    }

    fn run_hooks<F>(&mut self, mut f: F)
    where
        F: FnMut(&dyn NodeHooks, &mut GraphContext),
    {
        let hooks = std::mem::take(&mut self.hooks);
        for hook in &hooks {
            f(hook.as_ref(), self);
        }
        self.hooks = hooks;
    }

    // ── Preset store ──

    /// The preset store, lazily created on first access. Idempotent.
    pub fn preset_store_mut(&mut self) -> &mut PresetStore {
        self.store.get_or_insert_with(PresetStore::new)
    }

    /// The preset store, if one has been created or loaded.
    pub fn preset_store(&self) -> Option<&PresetStore> {
        self.store.as_ref()
    }

    // ── Persistence ──

    /// Serialize the graph, carrying the preset store through the extra bag.
    pub fn save(&mut self) -> Result<Value> {
        if let Some(store) = &self.store {
            let encoded = serde_json::to_value(store)?;
            self.extra.insert(STORE_KEY.to_string(), encoded);
        }
        for sub in &mut self.subgraphs {
            if let Some(store) = &sub.store {
                let encoded = serde_json::to_value(store)?;
                sub.extra.insert(STORE_KEY.to_string(), encoded);
            }
        }
        Ok(serde_json::to_value(&*self)?)
    }

    /// Deserialize a graph, restoring the preset store from the extra bag.
    pub fn load(value: Value) -> Result<Self> {
        let mut graph: GraphContext = serde_json::from_value(value)
            .map_err(|e| FlowStateError::Graph(format!("failed to decode graph: {e}")))?;
        graph.restore_counters();
        graph.restore_store()?;
        Ok(graph)
    }

    fn restore_counters(&mut self) {
        self.next_node = self.nodes.keys().map(|id| id.0 + 1).max().unwrap_or(0);
        self.next_link = self.links.keys().map(|id| id.0 + 1).max().unwrap_or(0);
        self.next_group = self.groups.keys().map(|id| id.0 + 1).max().unwrap_or(0);
        for sub in &mut self.subgraphs {
            sub.restore_counters();
        }
    }

    fn restore_store(&mut self) -> Result<()> {
        if let Some(raw) = self.extra.get(STORE_KEY) {
            let store: PresetStore = serde_json::from_value(raw.clone())
                .map_err(|e| FlowStateError::Store(format!("corrupt preset store: {e}")))?;
            self.store = Some(store);
        }
        for sub in &mut self.subgraphs {
            sub.restore_store()?;
        }
        Ok(())
    }
}
