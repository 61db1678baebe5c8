//! Declarative row/state descriptions for the rendering host.
//!
//! The core never draws. It emits plain row descriptors plus cheap signature
//! strings; the host compares signatures to decide when a redraw is worth it
//! and delivers pointer hits back as row-level actions.

use crate::graph::GraphContext;
use crate::group::GroupPanel;
use crate::mode::AggregateMode;
use crate::preset::PresetStore;

/// One row of the preset browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetPanelRow {
    pub label: String,
    pub clickable: bool,
    pub selected: bool,
    /// Absent on placeholder rows.
    pub index: Option<u32>,
}

/// Rows for the preset browser. An empty store yields a single inert
/// placeholder row.
pub fn preset_panel_rows(store: &PresetStore, current: u32) -> Vec<PresetPanelRow> {
    let indexes = store.list_indexes();
    if indexes.is_empty() {
        return vec![PresetPanelRow {
            label: "No Recorded Presets".to_string(),
            clickable: false,
            selected: false,
            index: None,
        }];
    }

    indexes
        .into_iter()
        .map(|idx| PresetPanelRow {
            label: format!("{idx}.{}", store.name_of(idx)),
            clickable: true,
            selected: idx == current,
            index: Some(idx),
        })
        .collect()
}

/// Display label for a preset, with a marker on the current one.
pub fn display_label(store: &PresetStore, index: u32, is_current: bool) -> String {
    let prefix = if is_current { "\u{25b6} " } else { "" };
    format!("{prefix}{index}.{}", store.name_of(index))
}

/// Change-detection signature for the preset browser: redraw only when the
/// current index or any row label moved.
pub fn preset_panel_signature(store: &PresetStore, current: u32) -> String {
    let rows: Vec<String> = store
        .list_indexes()
        .into_iter()
        .map(|idx| format!("{idx}:{}", store.name_of(idx)))
        .collect();
    format!("{current}::{}", rows.join("|"))
}

/// One row of the group toggle panel, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRowView {
    pub title: String,
    pub state: AggregateMode,
    pub show_nav: bool,
}

/// Snapshot the panel's rows for rendering. Rows whose group vanished since
/// the last refresh are skipped.
pub fn group_row_views(graph: &GraphContext, panel: &GroupPanel) -> Vec<GroupRowView> {
    let show_nav = panel.config().show_nav;
    panel
        .rows()
        .iter()
        .filter_map(|row| {
            graph.find_group(row.group).map(|group| GroupRowView {
                title: group.title.clone(),
                state: row.state,
                show_nav,
            })
        })
        .collect()
}

/// Change-detection signature for the group panel.
pub fn group_panel_signature(graph: &GraphContext, panel: &GroupPanel) -> String {
    group_row_views(graph, panel)
        .iter()
        .map(|v| format!("{}:{}", v.title, v.state))
        .collect::<Vec<_>>()
        .join("|")
}
