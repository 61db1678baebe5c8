//! The execution-mode model.
//!
//! Every processing node carries a tri-state execution flag: it either runs
//! normally, forwards its inputs untouched, or is skipped entirely. Sets of
//! nodes (group members, preset snapshots) are described by an aggregate that
//! adds a fourth, display-only `Mixed` state for disagreeing sets.

use crate::graph::{GraphContext, NodeId};
use serde::{Deserialize, Serialize};

/// The tri-state execution flag on a processing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Node executes normally.
    Enabled,
    /// Node forwards its inputs without executing.
    Bypassed,
    /// Node is skipped entirely.
    Disabled,
}

impl Mode {
    /// All settable modes, in display order.
    pub fn all() -> &'static [Mode] {
        &[Mode::Enabled, Mode::Bypassed, Mode::Disabled]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Enabled => "Enable",
            Mode::Bypassed => "Bypass",
            Mode::Disabled => "Muted",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The observable state of a node set: a shared [`Mode`], or `Mixed` when the
/// members disagree.
///
/// `Mixed` is display-only. There is deliberately no API that sets a group to
/// `Mixed`; it can only arise from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateMode {
    Enabled,
    Bypassed,
    Disabled,
    Mixed,
}

impl AggregateMode {
    /// The settable mode this aggregate corresponds to, if any.
    pub fn as_mode(&self) -> Option<Mode> {
        match self {
            AggregateMode::Enabled => Some(Mode::Enabled),
            AggregateMode::Bypassed => Some(Mode::Bypassed),
            AggregateMode::Disabled => Some(Mode::Disabled),
            AggregateMode::Mixed => None,
        }
    }
}

impl From<Mode> for AggregateMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Enabled => AggregateMode::Enabled,
            Mode::Bypassed => AggregateMode::Bypassed,
            Mode::Disabled => AggregateMode::Disabled,
        }
    }
}

impl std::fmt::Display for AggregateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AggregateMode::Enabled => "Enable",
            AggregateMode::Bypassed => "Bypass",
            AggregateMode::Disabled => "Muted",
            AggregateMode::Mixed => "Mixed",
        };
        write!(f, "{label}")
    }
}

/// Aggregate the modes of a node set into a single observable state.
///
/// An empty set aggregates to `Disabled`: a group with no members has nothing
/// to run, so it reads as inert rather than enabled.
pub fn aggregate<I>(modes: I) -> AggregateMode
where
    I: IntoIterator<Item = Mode>,
{
    let mut iter = modes.into_iter();
    let first = match iter.next() {
        Some(mode) => mode,
        None => return AggregateMode::Disabled,
    };
    for mode in iter {
        if mode != first {
            return AggregateMode::Mixed;
        }
    }
    first.into()
}

/// Set the mode of every listed node and mark it for redraw.
///
/// Node ids with no live node are skipped; membership is recomputed by the
/// caller on the next refresh pass. An empty list is a no-op.
pub fn set_all(graph: &mut GraphContext, nodes: &[NodeId], mode: Mode) {
    for &id in nodes {
        if let Some(node) = graph.node_mut(id) {
            node.mode = mode;
            node.needs_redraw = true;
        }
    }
    if !nodes.is_empty() {
        graph.mark_dirty();
    }
}
