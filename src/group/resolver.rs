//! Group resolution: gathering, filtering, and ordering the panel's groups.
//!
//! Resolution is a pure recomputation from graph state plus the panel
//! config — the output is an ordered list of group ids, never authoritative
//! state. Row stability across refreshes is layered on top by the panel
//! (see [`crate::group::toggle`]).

use crate::graph::{GraphContext, GroupId, NodeGroup};
use crate::group::config::{normalize_hex_color, GroupPanelConfig, SortPolicy};
use regex::RegexBuilder;

/// Spatial tolerance band for position sorting, in canvas units.
const POSITION_BUCKET: f32 = 30.0;

/// Resolve the ordered, filtered set of groups for the panel.
pub fn resolve_groups(graph: &GraphContext, config: &GroupPanelConfig) -> Vec<GroupId> {
    let mut groups: Vec<&NodeGroup> = graph.groups().collect();
    if config.show_all_graphs {
        for sub in &graph.subgraphs {
            groups.extend(sub.groups());
        }
    }

    let color_filter = config.color_filter();
    let title_filter = compile_title_filter(&config.match_title);

    groups.retain(|group| {
        if !color_filter.is_empty() {
            let matched = group
                .color
                .as_deref()
                .and_then(normalize_hex_color)
                .is_some_and(|c| color_filter.contains(&c));
            if !matched {
                return false;
            }
        }
        if let Some(pattern) = &title_filter {
            if !pattern.is_match(&group.title) {
                return false;
            }
        }
        true
    });

    match config.sort {
        SortPolicy::Position => {
            groups.sort_by_key(|g| {
                (
                    (g.pos[1] / POSITION_BUCKET).floor() as i64,
                    (g.pos[0] / POSITION_BUCKET).floor() as i64,
                )
            });
        }
        SortPolicy::Alphanumeric => {
            groups.sort_by(|a, b| compare_titles(&a.title, &b.title));
        }
        SortPolicy::CustomAlphabet => {
            let alphabet = parse_alphabet(&config.custom_sort_alphabet);
            if alphabet.is_empty() {
                groups.sort_by(|a, b| compare_titles(&a.title, &b.title));
            } else {
                groups.sort_by(|a, b| {
                    let a_key = alphabet_key(&a.title, &alphabet);
                    let b_key = alphabet_key(&b.title, &alphabet);
                    match (a_key, b_key) {
                        (Some(ai), Some(bi)) => {
                            ai.cmp(&bi).then_with(|| compare_titles(&a.title, &b.title))
                        }
                        (Some(_), None) => std::cmp::Ordering::Less,
                        (None, Some(_)) => std::cmp::Ordering::Greater,
                        (None, None) => compare_titles(&a.title, &b.title),
                    }
                });
            }
        }
    }

    groups.iter().map(|g| g.id).collect()
}

/// Case-insensitive title pattern. An invalid pattern is no filter at all.
fn compile_title_filter(pattern: &str) -> Option<regex::Regex> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return None;
    }
    match RegexBuilder::new(trimmed).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern = trimmed, "invalid title pattern, ignoring filter: {e}");
            None
        }
    }
}

fn compare_titles(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Split the custom alphabet into lowercase tokens: comma-separated, or
/// per-character when no comma is present.
fn parse_alphabet(raw: &str) -> Vec<String> {
    let cleaned = raw.replace('\n', "");
    let cleaned = cleaned.trim().to_lowercase();
    if cleaned.is_empty() {
        return Vec::new();
    }
    if cleaned.contains(',') {
        cleaned
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        cleaned.chars().map(|c| c.to_string()).collect()
    }
}

/// Index of the first token the lowercased title starts with.
fn alphabet_key(title: &str, alphabet: &[String]) -> Option<usize> {
    let lower = title.to_lowercase();
    alphabet.iter().position(|token| lower.starts_with(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GroupId, NodeGroup};

    fn graph_with_titles(titles: &[&str]) -> GraphContext {
        let mut graph = GraphContext::new();
        for title in titles {
            graph.add_group(NodeGroup::new(GroupId::INVALID, *title));
        }
        graph
    }

    fn titles_of(graph: &GraphContext, ids: &[GroupId]) -> Vec<String> {
        ids.iter()
            .map(|&id| graph.find_group(id).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn test_position_sort_reading_order() {
        let mut graph = GraphContext::new();
        graph.add_group(NodeGroup::new(GroupId::INVALID, "right").at(400.0, 10.0));
        graph.add_group(NodeGroup::new(GroupId::INVALID, "below").at(0.0, 200.0));
        // 12 units lower than "right" but inside the same 30-unit band
        graph.add_group(NodeGroup::new(GroupId::INVALID, "left").at(20.0, 22.0));

        let config = GroupPanelConfig::default();
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["left", "right", "below"]);
    }

    #[test]
    fn test_alphanumeric_sort_is_case_insensitive() {
        let graph = graph_with_titles(&["banana", "Apple", "cherry"]);
        let config = GroupPanelConfig {
            sort: SortPolicy::Alphanumeric,
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_custom_alphabet_sort() {
        let graph = graph_with_titles(&["Zebra", "Apple", "Mango"]);
        let config = GroupPanelConfig {
            sort: SortPolicy::CustomAlphabet,
            custom_sort_alphabet: "m,a".to_string(),
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["Mango", "Apple", "Zebra"]);
    }

    #[test]
    fn test_custom_alphabet_char_split_and_ties() {
        let graph = graph_with_titles(&["beta", "bravo", "alpha", "delta"]);
        let config = GroupPanelConfig {
            sort: SortPolicy::CustomAlphabet,
            custom_sort_alphabet: "ba".to_string(), // chars: b, a
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        // b-matching first (alphabetical among themselves), then a, then none
        assert_eq!(
            titles_of(&graph, &order),
            vec!["beta", "bravo", "alpha", "delta"]
        );
    }

    #[test]
    fn test_empty_custom_alphabet_falls_back_alphanumeric() {
        let graph = graph_with_titles(&["b", "a"]);
        let config = GroupPanelConfig {
            sort: SortPolicy::CustomAlphabet,
            custom_sort_alphabet: "  \n ".to_string(),
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["a", "b"]);
    }

    #[test]
    fn test_color_filter_matches_normalized_forms() {
        let mut graph = GraphContext::new();
        graph.add_group(NodeGroup::new(GroupId::INVALID, "pink").colored("#FF00AA"));
        graph.add_group(NodeGroup::new(GroupId::INVALID, "short").colored("f0a"));
        graph.add_group(NodeGroup::new(GroupId::INVALID, "green").colored("#00ff00"));
        graph.add_group(NodeGroup::new(GroupId::INVALID, "plain"));

        let config = GroupPanelConfig {
            match_colors: "f0a".to_string(),
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["pink", "short"]);
    }

    #[test]
    fn test_title_filter_case_insensitive() {
        let graph = graph_with_titles(&["Loaders", "samplers", "Output"]);
        let config = GroupPanelConfig {
            match_title: "^load|^samp".to_string(),
            ..Default::default()
        };
        let order = resolve_groups(&graph, &config);
        assert_eq!(titles_of(&graph, &order), vec!["Loaders", "samplers"]);
    }

    #[test]
    fn test_invalid_title_pattern_means_no_filter() {
        let graph = graph_with_titles(&["a", "b"]);
        let config = GroupPanelConfig {
            match_title: "[unclosed".to_string(),
            ..Default::default()
        };
        assert_eq!(resolve_groups(&graph, &config).len(), 2);
    }

    #[test]
    fn test_subgraph_groups_unioned_when_configured() {
        let mut graph = graph_with_titles(&["top"]);
        let mut sub = GraphContext::new();
        sub.add_group(NodeGroup::new(GroupId(100), "nested"));
        graph.subgraphs.push(sub);

        let all = GroupPanelConfig::default();
        assert_eq!(resolve_groups(&graph, &all).len(), 2);

        let current_only = GroupPanelConfig {
            show_all_graphs: false,
            ..Default::default()
        };
        assert_eq!(resolve_groups(&graph, &current_only).len(), 1);
    }
}
