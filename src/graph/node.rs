//! Node representation for the graph model.
//!
//! Nodes are modeled as explicit data — id, mode, widgets, input slots —
//! instead of the duck-typed shapes the rendering host works with. The
//! [`NodeKind`] variants the engines care about (relays, preset switches,
//! group editors) are resolved by pattern matching, never property probing.

use crate::graph::id::{LinkId, NodeId};
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// What role a node plays for the state engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// An ordinary processing node.
    Plain,
    /// A pass-through node, transparent to selector resolution.
    Relay,
    /// A node carrying the preset selector input and local index widget.
    PresetSwitch,
    /// A node hosting the group toggle panel.
    GroupEditor,
}

impl NodeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Plain => "Node",
            NodeKind::Relay => "Reroute",
            NodeKind::PresetSwitch => "Preset Switch",
            NodeKind::GroupEditor => "Group Editor",
        }
    }
}

/// The current value of a configuration widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetValue {
    Number(f64),
    Text(String),
    Toggle(bool),
}

impl WidgetValue {
    /// Coerce to a finite number. Text values parse via `f64::from_str`;
    /// toggles never coerce.
    pub fn as_finite_number(&self) -> Option<f64> {
        match self {
            WidgetValue::Number(n) if n.is_finite() => Some(*n),
            WidgetValue::Number(_) => None,
            WidgetValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            WidgetValue::Toggle(_) => None,
        }
    }
}

/// A named configuration widget on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub value: WidgetValue,
}

impl Widget {
    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: WidgetValue::Number(value),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: WidgetValue::Text(value.into()),
        }
    }
}

/// A named input slot, optionally wired to an upstream link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSlot {
    pub name: String,
    pub link: Option<LinkId>,
}

/// A processing node in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub title: String,
    pub kind: NodeKind,
    pub mode: Mode,
    pub pos: [f32; 2],
    pub size: [f32; 2],
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub inputs: Vec<InputSlot>,
    /// Render-layer flag, not persisted.
    #[serde(skip)]
    pub needs_redraw: bool,
}

impl GraphNode {
    pub fn new(id: NodeId, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            mode: Mode::Enabled,
            pos: [0.0, 0.0],
            size: [140.0, 60.0],
            widgets: Vec::new(),
            inputs: Vec::new(),
            needs_redraw: false,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = [x, y];
        self
    }

    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, link: Option<LinkId>) -> Self {
        self.inputs.push(InputSlot {
            name: name.into(),
            link,
        });
        self
    }

    /// Look up an input slot by name.
    pub fn input(&self, name: &str) -> Option<&InputSlot> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Look up a widget's current value by name.
    pub fn widget_value(&self, name: &str) -> Option<&WidgetValue> {
        self.widgets.iter().find(|w| w.name == name).map(|w| &w.value)
    }

    /// Overwrite a widget's value by name. Returns false if no such widget.
    pub fn set_widget_value(&mut self, name: &str, value: WidgetValue) -> bool {
        match self.widgets.iter_mut().find(|w| w.name == name) {
            Some(widget) => {
                widget.value = value;
                true
            }
            None => false,
        }
    }
}
