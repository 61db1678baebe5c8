//! Graph model: the host-interface abstraction the state engines operate on.
//!
//! Models the contract the rendering host provides — enumerable nodes with
//! stable ids and mutable execution modes, links with origins, spatial node
//! groups, and an extra-data bag for persistence — as explicit owned data.
//!
//! # Design
//!
//! - **Explicit context** — no ambient globals; every engine operation takes
//!   a `&mut GraphContext`.
//! - **Pattern-matched node roles** — `NodeKind` replaces duck-typed shape
//!   probing.
//! - **Observer hooks** — `NodeHooks` replaces monkey-patching of node
//!   lifecycle methods.

pub mod context;
pub mod group;
pub mod hooks;
pub mod id;
pub mod node;

pub use context::{GraphContext, GraphLink, STORE_KEY};
pub use group::NodeGroup;
pub use hooks::{NodeHooks, PanelSizeHook};
pub use id::{GroupId, LinkId, NodeId};
pub use node::{GraphNode, InputSlot, NodeKind, Widget, WidgetValue};
