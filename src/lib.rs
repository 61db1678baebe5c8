//! # flowstate: execution-mode presets for node graphs
//!
//! Manages named, restorable snapshots of per-node enable/bypass/disable
//! state across a directed graph of processing nodes, plus a derived group
//! panel that toggles spatial clusters of nodes together under configurable
//! exclusivity rules.
//!
//! ## Architecture
//!
//! - **Graph model**: an explicit, owned representation of the host graph's
//!   interface — nodes with stable ids and mutable modes, links, spatial
//!   groups, and an extra-data bag the preset store persists through
//! - **Preset engine**: captures whole-graph snapshots into a dense-indexed
//!   store and applies them back onto graphs whose node set may have drifted
//! - **Group panel**: derives ordered, filtered group rows and enforces
//!   single-select / always-one exclusivity when toggling them
//! - **Runtime**: a dedicated-thread tick loop; communicates with the UI
//!   over crossbeam channels and pushes declarative row snapshots
//!
//! The "current" preset is computed, never stored: each tick resolves the
//! switch node's selector input (walking through relay nodes), falling back
//! to its local widget, and applies the preset when the value moves.
//!
//! ## Example
//!
//! ```
//! use flowstate::graph::{GraphContext, GraphNode, NodeId, NodeKind, Widget};
//! use flowstate::mode::Mode;
//! use flowstate::preset::PresetEngine;
//!
//! let mut graph = GraphContext::new();
//! let sampler = graph.add_node("sampler", NodeKind::Plain);
//! let switch = graph.insert_node(
//!     GraphNode::new(NodeId::INVALID, "switch", NodeKind::PresetSwitch)
//!         .with_widget(Widget::number("preset_index", 0.0))
//!         .with_input("preset_index", None),
//! );
//!
//! let mut engine = PresetEngine::new();
//! engine.add_preset(&mut graph, switch); // snapshot as preset 0
//!
//! graph.node_mut(sampler).unwrap().mode = Mode::Bypassed;
//! engine.add_preset(&mut graph, switch); // snapshot as preset 1
//!
//! engine.switch_to(&mut graph, switch, 0);
//! assert_eq!(graph.node(sampler).unwrap().mode, Mode::Enabled);
//! ```

pub mod bridge;
pub mod error;
pub mod graph;
pub mod group;
pub mod mode;
pub mod preset;
pub mod resolver;
pub mod runtime;
pub mod view;

// Re-export commonly used types
pub use bridge::{GroupAction, PanelBridge, PanelCommand, PanelMessage, PresetAction};
pub use error::{FlowStateError, Result};
pub use graph::{GraphContext, GraphNode, GroupId, LinkId, NodeGroup, NodeId, NodeKind};
pub use group::{GroupPanel, GroupPanelConfig, SortPolicy, ToggleRestriction};
pub use mode::{aggregate, set_all, AggregateMode, Mode};
pub use preset::{ApplyOutcome, Preset, PresetEngine, PresetStore};
pub use runtime::StateRuntime;
