//! Group toggles: deriving ordered group rows and switching them as units.
//!
//! `config` holds the user-facing match/sort/restriction settings, `resolver`
//! turns graph state plus config into an ordered group list, and `toggle`
//! layers row state, refresh stability, and exclusivity enforcement on top.

pub mod config;
pub mod resolver;
pub mod toggle;

pub use config::{normalize_hex_color, GroupPanelConfig, SortPolicy, ToggleRestriction};
pub use resolver::resolve_groups;
pub use toggle::{aggregate_group, GroupPanel, GroupRow};
