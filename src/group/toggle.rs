//! The group toggle panel: ordered rows with aggregate states and
//! exclusivity enforcement.
//!
//! Rows are pure recomputation artifacts of graph state — `refresh` fully
//! rebuilds them from the resolved group list and live member modes, so any
//! number of missed or duplicate refreshes leaves the panel consistent.
//! Mutations validate the restriction policy before touching any node; a
//! rejected toggle changes nothing.

use crate::graph::{GraphContext, GroupId};
use crate::group::config::{GroupPanelConfig, ToggleRestriction};
use crate::group::resolver::resolve_groups;
use crate::mode::{aggregate, set_all, AggregateMode, Mode};

/// One panel row: a group and its aggregate display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupRow {
    pub group: GroupId,
    pub state: AggregateMode,
}

/// The group toggle panel.
#[derive(Debug, Default)]
pub struct GroupPanel {
    config: GroupPanelConfig,
    rows: Vec<GroupRow>,
    /// Explicit order override; refreshed to the final row order after every
    /// pass so later refreshes keep the arrangement stable.
    manual_order: Vec<GroupId>,
}

impl GroupPanel {
    pub fn new(config: GroupPanelConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            manual_order: Vec::new(),
        }
    }

    pub fn config(&self) -> &GroupPanelConfig {
        &self.config
    }

    /// Replace the panel config. Rows and the order override are dropped so
    /// the next refresh re-sorts from scratch under the new rules.
    pub fn set_config(&mut self, config: GroupPanelConfig) {
        self.config = config;
        self.rows.clear();
        self.manual_order.clear();
    }

    pub fn rows(&self) -> &[GroupRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&GroupRow> {
        self.rows.get(index)
    }

    /// Record a user-driven row arrangement; later refreshes preserve it.
    pub fn set_manual_order(&mut self, order: Vec<GroupId>) {
        self.manual_order = order;
    }

    /// Rebuild the rows from current graph state.
    ///
    /// Order: the manual override wins when present; otherwise surviving rows
    /// keep their position and new groups append in computed order. The
    /// override is updated to the final order afterwards.
    pub fn refresh(&mut self, graph: &GraphContext) {
        let computed = resolve_groups(graph, &self.config);
        let ordered = if !self.manual_order.is_empty() {
            reorder_preferring(&computed, &self.manual_order)
        } else {
            let current: Vec<GroupId> = self.rows.iter().map(|r| r.group).collect();
            reorder_preferring(&computed, &current)
        };

        self.rows = ordered
            .iter()
            .map(|&group| GroupRow {
                group,
                state: aggregate_group(graph, group),
            })
            .collect();
        self.manual_order = ordered;
    }

    /// Set a row's members to `target`, honoring the restriction policy.
    /// Returns false when the policy rejects the change (nothing mutated).
    pub fn set_row_state(&mut self, graph: &mut GraphContext, row: usize, target: Mode) -> bool {
        if row >= self.rows.len() {
            return false;
        }
        let restriction = self.config.toggle_restriction;

        if target == Mode::Enabled && restriction.limits_to_one() {
            for i in 0..self.rows.len() {
                if i == row {
                    continue;
                }
                let members = graph.find_group_members(self.rows[i].group);
                set_all(graph, &members, Mode::Disabled);
                self.rows[i].state = AggregateMode::Disabled;
            }
        }

        if target != Mode::Enabled && restriction == ToggleRestriction::AlwaysOne {
            let enabled = self
                .rows
                .iter()
                .filter(|r| r.state == AggregateMode::Enabled)
                .count();
            if enabled <= 1 && self.rows[row].state == AggregateMode::Enabled {
                tracing::debug!(row, "rejected toggle: last enabled row under 'always one'");
                return false;
            }
        }

        let members = graph.find_group_members(self.rows[row].group);
        set_all(graph, &members, target);
        self.rows[row].state = target.into();
        true
    }

    /// Apply `mode` to every row. Enabling under a single-select policy
    /// enables only the first row (the exclusivity rule disables the rest).
    pub fn set_batch_state(&mut self, graph: &mut GraphContext, mode: Mode) {
        if self.rows.is_empty() {
            return;
        }
        if mode == Mode::Enabled && self.config.toggle_restriction.limits_to_one() {
            self.set_row_state(graph, 0, Mode::Enabled);
            return;
        }
        for row in 0..self.rows.len() {
            self.set_row_state(graph, row, mode);
        }
    }

    /// Rename a row's group. The title is trimmed; empty or unchanged titles
    /// are rejected without mutation.
    pub fn rename_group(&mut self, graph: &mut GraphContext, row: usize, title: &str) -> bool {
        let Some(&GroupRow { group, .. }) = self.rows.get(row) else {
            return false;
        };
        let next = title.trim();
        if next.is_empty() {
            return false;
        }
        let Some(group_ref) = graph.find_group_mut(group) else {
            return false;
        };
        if group_ref.title == next {
            return false;
        }
        group_ref.title = next.to_string();
        graph.mark_dirty();
        true
    }
}

/// Aggregate a group's member modes from live graph state.
pub fn aggregate_group(graph: &GraphContext, group: GroupId) -> AggregateMode {
    let members = graph.find_group_members(group);
    aggregate(
        members
            .iter()
            .filter_map(|&id| graph.node(id))
            .map(|n| n.mode),
    )
}

/// Reorder `computed` to follow `preferred` for ids present in both; the
/// remainder keeps its computed order and appends at the end.
fn reorder_preferring(computed: &[GroupId], preferred: &[GroupId]) -> Vec<GroupId> {
    let mut remaining: Vec<GroupId> = computed.to_vec();
    let mut ordered = Vec::with_capacity(computed.len());
    for &id in preferred {
        if let Some(pos) = remaining.iter().position(|&g| g == id) {
            ordered.push(remaining.remove(pos));
        }
    }
    ordered.extend(remaining);
    ordered
}
