//! The preset store: a keyed collection of execution-mode snapshots.
//!
//! Presets are identified by a dense, zero-based integer index. The store
//! owns the contiguity invariant: deleting a preset shifts every higher
//! index down by one, renaming presets that still carry their derived
//! default name so the name tracks the index. Explicitly renamed presets
//! keep their name through any number of reindexes.
//!
//! Persisted schema (JSON, single version tag, no migration):
//!
//! ```json
//! {
//!   "version": 1,
//!   "presets": {
//!     "0": { "name": "Preset 0", "nodeStates": { "3": { "mode": "enabled" } }, "updatedAt": 0 }
//!   },
//!   "options": { "onMissingNode": "skip", "indexOutOfRange": "warn" }
//! }
//! ```

use crate::graph::NodeId;
use crate::mode::Mode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current schema version written by [`PresetStore::new`].
pub const STORE_VERSION: u32 = 1;

/// How `apply` treats snapshot entries whose node no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingNodePolicy {
    /// Skip the entry, count it, and log a warning after the pass.
    Skip,
    /// Skip the entry without logging.
    Silent,
}

impl Default for MissingNodePolicy {
    fn default() -> Self {
        MissingNodePolicy::Skip
    }
}

/// How operations targeting an absent preset index are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Log a warning.
    Warn,
    /// Stay quiet.
    Silent,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        IndexPolicy::Warn
    }
}

/// Store-wide policies, persisted alongside the presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOptions {
    #[serde(default)]
    pub on_missing_node: MissingNodePolicy,
    #[serde(default)]
    pub index_out_of_range: IndexPolicy,
}

/// The captured execution state of a single node.
///
/// `mode` is optional so snapshots taken from (or restored into) graphs
/// where a node lacked a mode field stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
}

impl NodeState {
    pub fn of(mode: Mode) -> Self {
        Self { mode: Some(mode) }
    }
}

/// A named snapshot of every node's execution mode at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub node_states: BTreeMap<NodeId, NodeState>,
    /// Unix milliseconds of the last capture or rename.
    #[serde(default)]
    pub updated_at: i64,
}

impl Preset {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_states: BTreeMap::new(),
            updated_at: now_millis(),
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The derived default name for a preset at `index`.
pub fn default_name(index: u32) -> String {
    format!("Preset {index}")
}

/// Whether `name` is exactly the derived default for `index`.
pub fn is_default_name(name: &str, index: u32) -> bool {
    name == default_name(index)
}

/// Keyed collection of presets with dense, contiguous indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetStore {
    pub version: u32,
    #[serde(default)]
    presets: BTreeMap<u32, Preset>,
    #[serde(default)]
    pub options: StoreOptions,
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetStore {
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            presets: BTreeMap::new(),
            options: StoreOptions::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn get(&self, index: u32) -> Option<&Preset> {
        self.presets.get(&index)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut Preset> {
        self.presets.get_mut(&index)
    }

    pub fn put(&mut self, index: u32, preset: Preset) {
        self.presets.insert(index, preset);
    }

    /// All currently-used indices, ascending.
    pub fn list_indexes(&self) -> Vec<u32> {
        self.presets.keys().copied().collect()
    }

    /// The display name for `index`: the stored name, or the derived default.
    pub fn name_of(&self, index: u32) -> String {
        self.presets
            .get(&index)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| default_name(index))
    }

    /// Remove the preset at `index` and shift every higher index down by one.
    ///
    /// Presets still carrying their derived default name are renamed to match
    /// their new index; explicit names are preserved verbatim. Returns false
    /// when the index is absent.
    pub fn delete(&mut self, index: u32) -> bool {
        if self.presets.remove(&index).is_none() {
            return false;
        }

        let tail = self.presets.split_off(&index);
        for (old_index, mut preset) in tail {
            let new_index = old_index - 1;
            if is_default_name(&preset.name, old_index) {
                preset.name = default_name(new_index);
            }
            self.presets.insert(new_index, preset);
        }

        tracing::info!(index, "deleted preset and reindexed");
        true
    }

    /// Rename the preset at `index`. Whitespace is trimmed; an empty name
    /// collapses back to the derived default. Returns false when the index
    /// is absent.
    pub fn rename(&mut self, index: u32, name: &str) -> bool {
        let Some(preset) = self.presets.get_mut(&index) else {
            if self.options.index_out_of_range == IndexPolicy::Warn {
                tracing::warn!(index, "preset not found, cannot rename");
            }
            return false;
        };

        let normalized = {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                default_name(index)
            } else {
                trimmed.to_string()
            }
        };
        if preset.name == normalized {
            return true;
        }
        preset.name = normalized;
        preset.updated_at = now_millis();
        true
    }

    /// The index a fresh capture should use: one past the highest in use.
    pub fn next_available_index(&self) -> u32 {
        self.presets
            .keys()
            .next_back()
            .map(|&max| max + 1)
            .unwrap_or(0)
    }

    /// Cyclic successor of `current` among existing indices. The first index
    /// greater than `current`, wrapping to the minimum; `current` itself when
    /// the store is empty.
    pub fn next(&self, current: u32) -> u32 {
        let mut keys = self.presets.keys();
        if self.presets.is_empty() {
            return current;
        }
        keys.find(|&&i| i > current)
            .or_else(|| self.presets.keys().next())
            .copied()
            .unwrap_or(current)
    }

    /// Cyclic predecessor of `current` among existing indices. The last index
    /// less than `current`, wrapping to the maximum; `current` itself when
    /// the store is empty.
    pub fn prev(&self, current: u32) -> u32 {
        if self.presets.is_empty() {
            return current;
        }
        self.presets
            .range(..current)
            .next_back()
            .map(|(&i, _)| i)
            .or_else(|| self.presets.keys().next_back().copied())
            .unwrap_or(current)
    }
}
