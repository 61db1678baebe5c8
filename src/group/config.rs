//! Group panel configuration.
//!
//! Match/sort/restriction settings for the group toggle panel, serialized as
//! TOML so a panel setup can be saved and reloaded independently of any
//! graph. Field names mirror the panel's persisted property names.

use crate::error::{FlowStateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordering policy for resolved group rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortPolicy {
    /// Reading order: row bucket (`floor(y / 30)`), then column bucket
    /// (`floor(x / 30)`). The 30-unit bands keep near-aligned groups from
    /// reordering on sub-pixel jitter.
    #[serde(rename = "position")]
    Position,
    /// Case-insensitive title comparison.
    #[serde(rename = "alphanumeric")]
    Alphanumeric,
    /// Ordered prefix tokens; see [`crate::group::resolver`].
    #[serde(rename = "custom alphabet")]
    CustomAlphabet,
}

impl Default for SortPolicy {
    fn default() -> Self {
        SortPolicy::Position
    }
}

/// How many rows may be enabled at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleRestriction {
    /// No constraint.
    #[serde(rename = "default")]
    Default,
    /// At most one row enabled at a time.
    #[serde(rename = "one")]
    One,
    /// Exactly one: additionally forbids disabling the sole enabled row.
    #[serde(rename = "always one")]
    AlwaysOne,
}

impl Default for ToggleRestriction {
    fn default() -> Self {
        ToggleRestriction::Default
    }
}

impl ToggleRestriction {
    /// Whether this policy limits the panel to a single enabled row.
    pub fn limits_to_one(&self) -> bool {
        matches!(self, ToggleRestriction::One | ToggleRestriction::AlwaysOne)
    }
}

/// User-configured match, sort, and restriction rules for the group panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupPanelConfig {
    /// Comma-separated colors a group must match; empty means no filter.
    pub match_colors: String,
    /// Case-insensitive title pattern; invalid patterns mean no filter.
    pub match_title: String,
    /// Show the per-row navigate column.
    pub show_nav: bool,
    /// Union groups across nested sub-graphs.
    pub show_all_graphs: bool,
    pub sort: SortPolicy,
    /// Prefix tokens for [`SortPolicy::CustomAlphabet`], comma-separated
    /// (split per character when no comma is present).
    pub custom_sort_alphabet: String,
    pub toggle_restriction: ToggleRestriction,
}

impl Default for GroupPanelConfig {
    fn default() -> Self {
        Self {
            match_colors: String::new(),
            match_title: String::new(),
            show_nav: true,
            show_all_graphs: true,
            sort: SortPolicy::Position,
            custom_sort_alphabet: String::new(),
            toggle_restriction: ToggleRestriction::Default,
        }
    }
}

impl GroupPanelConfig {
    /// The normalized color filter set. Empty tokens are dropped.
    pub fn color_filter(&self) -> Vec<String> {
        self.match_colors
            .split(',')
            .filter_map(|token| normalize_hex_color(token))
            .collect()
    }

    /// Load a panel config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&contents)
            .map_err(|e| FlowStateError::Config(format!("invalid panel config: {e}")))
    }

    /// Save a panel config as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| FlowStateError::Config(format!("failed to encode panel config: {e}")))?;
        std::fs::write(path.as_ref(), contents)?;
        Ok(())
    }
}

/// Normalize a color token to lowercase `#rrggbb` form.
///
/// Shorthand 3-digit hex doubles each channel digit; a leading `#` is
/// optional. Returns None for empty input.
pub fn normalize_hex_color(color: &str) -> Option<String> {
    let trimmed = color.trim().to_lowercase();
    let hex = trimmed.strip_prefix('#').unwrap_or(&trimmed);
    if hex.is_empty() {
        return None;
    }
    if hex.len() == 3 {
        let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
        return Some(format!("#{doubled}"));
    }
    Some(format!("#{hex}"))
}
