//! Preset state: named, restorable snapshots of per-node execution modes.
//!
//! The store (`store`) owns the keyed snapshot collection and its dense-index
//! invariant; the engine (`engine`) moves state between the store and the
//! live graph and drives automatic switching off the resolved selector value.

pub mod engine;
pub mod store;

pub use engine::{ApplyOutcome, PresetEngine};
pub use store::{
    default_name, is_default_name, IndexPolicy, MissingNodePolicy, NodeState, Preset,
    PresetStore, StoreOptions, STORE_VERSION,
};
