//! Integration tests for group resolution, toggling, and panel config.

mod common;

use common::builders::{group_id, GraphBuilder};
use flowstate::group::{
    GroupPanel, GroupPanelConfig, SortPolicy, ToggleRestriction,
};
use flowstate::mode::{AggregateMode, Mode};

fn three_group_graph() -> flowstate::graph::GraphContext {
    GraphBuilder::new()
        .group("Zebra", 2)
        .group("Apple", 2)
        .group("Mango", 2)
        .build()
}

#[test]
fn custom_alphabet_orders_rows() {
    let graph = three_group_graph();
    let mut panel = GroupPanel::new(GroupPanelConfig {
        sort: SortPolicy::CustomAlphabet,
        custom_sort_alphabet: "m,a".to_string(),
        ..Default::default()
    });
    panel.refresh(&graph);

    let titles: Vec<String> = panel
        .rows()
        .iter()
        .map(|r| graph.find_group(r.group).unwrap().title.clone())
        .collect();
    assert_eq!(titles, vec!["Mango", "Apple", "Zebra"]);
}

#[test]
fn single_select_keeps_exactly_one_row_enabled() {
    let mut graph = three_group_graph();
    let mut panel = GroupPanel::new(GroupPanelConfig {
        toggle_restriction: ToggleRestriction::One,
        ..Default::default()
    });
    panel.refresh(&graph);

    assert!(panel.set_row_state(&mut graph, 1, Mode::Enabled));
    let states: Vec<AggregateMode> = panel.rows().iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        vec![
            AggregateMode::Disabled,
            AggregateMode::Enabled,
            AggregateMode::Disabled
        ]
    );

    // enabling another row moves the selection
    assert!(panel.set_row_state(&mut graph, 2, Mode::Enabled));
    let states: Vec<AggregateMode> = panel.rows().iter().map(|r| r.state).collect();
    assert_eq!(
        states,
        vec![
            AggregateMode::Disabled,
            AggregateMode::Disabled,
            AggregateMode::Enabled
        ]
    );
}

#[test]
fn always_one_rejects_disabling_the_last_row() {
    let mut graph = three_group_graph();
    let mut panel = GroupPanel::new(GroupPanelConfig {
        toggle_restriction: ToggleRestriction::AlwaysOne,
        ..Default::default()
    });
    panel.refresh(&graph);
    panel.set_row_state(&mut graph, 1, Mode::Enabled);

    assert!(!panel.set_row_state(&mut graph, 1, Mode::Disabled));
    assert!(!panel.set_row_state(&mut graph, 1, Mode::Bypassed));
    assert_eq!(panel.row(1).unwrap().state, AggregateMode::Enabled);

    // member nodes untouched by the rejected request
    let members = graph.find_group_members(group_id(&graph, "Apple"));
    for id in members {
        assert_eq!(graph.node(id).unwrap().mode, Mode::Enabled);
    }
}

#[test]
fn refresh_tracks_external_mode_edits() {
    let mut graph = three_group_graph();
    let mut panel = GroupPanel::new(GroupPanelConfig::default());
    panel.refresh(&graph);
    assert_eq!(panel.row(0).unwrap().state, AggregateMode::Enabled);

    // another actor flips one member: the row reads mixed on next refresh
    let members = graph.find_group_members(group_id(&graph, "Zebra"));
    graph.node_mut(members[0]).unwrap().mode = Mode::Disabled;
    panel.refresh(&graph);
    assert_eq!(panel.row(0).unwrap().state, AggregateMode::Mixed);

    // the panel can still overwrite the whole group
    assert!(panel.set_row_state(&mut graph, 0, Mode::Disabled));
    panel.refresh(&graph);
    assert_eq!(panel.row(0).unwrap().state, AggregateMode::Disabled);
}

#[test]
fn title_filter_narrows_rows_and_bad_patterns_do_not() {
    let graph = three_group_graph();

    let mut filtered = GroupPanel::new(GroupPanelConfig {
        match_title: "^(apple|mango)$".to_string(),
        ..Default::default()
    });
    filtered.refresh(&graph);
    assert_eq!(filtered.rows().len(), 2);

    let mut broken = GroupPanel::new(GroupPanelConfig {
        match_title: "(*invalid".to_string(),
        ..Default::default()
    });
    broken.refresh(&graph);
    assert_eq!(broken.rows().len(), 3);
}

#[test]
fn config_toml_round_trip() {
    let config = GroupPanelConfig {
        match_colors: "f0a,#33ff33".to_string(),
        match_title: "^render".to_string(),
        show_nav: false,
        show_all_graphs: false,
        sort: SortPolicy::CustomAlphabet,
        custom_sort_alphabet: "m,a,z".to_string(),
        toggle_restriction: ToggleRestriction::AlwaysOne,
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.toml");
    config.save(&path).unwrap();

    let loaded = GroupPanelConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn config_load_rejects_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.toml");
    std::fs::write(&path, "sort = \"no such policy\"").unwrap();
    assert!(GroupPanelConfig::load(&path).is_err());
}
