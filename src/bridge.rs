//! Thread boundary between the state runtime and the UI.
//!
//! The rendering host sends row-level actions as commands; the runtime
//! answers with declarative row snapshots and outcome notices. Both
//! directions are bounded crossbeam channels drained without blocking.

use crate::graph::{GroupId, NodeId};
use crate::group::GroupPanelConfig;
use crate::mode::Mode;
use crate::view::{GroupRowView, PresetPanelRow};
use crossbeam_channel::{bounded, Receiver, Sender};

/// Preset browser actions on a specific switch node.
#[derive(Debug, Clone)]
pub enum PresetAction {
    /// Capture at the next available index and switch to it.
    Add,
    /// Overwrite the snapshot at the current index.
    RecordCurrent,
    /// Delete the current preset, reindex, fall back to the nearest index.
    DeleteSelected,
    /// Switch to the cyclic predecessor.
    Prev,
    /// Switch to the cyclic successor.
    Next,
    /// Switch directly to an index (a browser row click).
    Switch(u32),
    /// Rename the current preset.
    Rename(String),
}

/// Group panel actions.
#[derive(Debug, Clone)]
pub enum GroupAction {
    /// A row's enable/bypass/disable control was clicked.
    SetRowState { row: usize, state: Mode },
    /// A batch button was clicked.
    SetBatch(Mode),
    /// Double-activate rename on a row.
    Rename { row: usize, title: String },
    /// Per-row navigate click; pure view action.
    Navigate(usize),
    /// Panel settings changed.
    SetConfig(Box<GroupPanelConfig>),
}

/// Commands sent from the UI thread to the runtime.
#[derive(Debug, Clone)]
pub enum PanelCommand {
    /// A preset browser action targeting a switch node.
    Preset { node: NodeId, action: PresetAction },
    /// A group panel action.
    Groups(GroupAction),
    /// Force a group refresh outside the periodic tick.
    Refresh,
    /// Shut down the runtime thread.
    Shutdown,
}

/// Messages sent from the runtime to the UI thread.
#[derive(Debug, Clone)]
pub enum PanelMessage {
    /// Preset browser rows changed.
    PresetRows { node: NodeId, rows: Vec<PresetPanelRow> },
    /// Group panel rows changed.
    GroupRows(Vec<GroupRowView>),
    /// A preset was applied; `missing` counts snapshot entries whose node
    /// no longer exists.
    PresetApplied { index: u32, missing: usize },
    /// An apply/switch targeted an index with no stored preset.
    PresetNotFound(u32),
    /// The host should center the canvas on this group.
    NavigateToGroup(GroupId),
    /// The canvas needs a redraw.
    Redraw,
    /// Runtime is shutting down.
    Shutdown,
}

/// Channel capacity for commands (UI → runtime).
const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for messages (runtime → UI).
const MSG_CHANNEL_CAPACITY: usize = 1024;

/// UI-side handle for communicating with the runtime thread.
pub struct PanelBridge {
    pub cmd_tx: Sender<PanelCommand>,
    pub msg_rx: Receiver<PanelMessage>,
}

impl PanelBridge {
    /// Create a new bridge pair: `(bridge_for_ui, cmd_rx, msg_tx)`.
    ///
    /// The runtime thread owns `cmd_rx` and `msg_tx`.
    pub fn new() -> (Self, Receiver<PanelCommand>, Sender<PanelMessage>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (Self { cmd_tx, msg_rx }, cmd_rx, msg_tx)
    }

    /// Drain all pending messages without blocking.
    pub fn drain(&self) -> Vec<PanelMessage> {
        let mut msgs = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            msgs.push(msg);
        }
        msgs
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<PanelMessage> {
        self.msg_rx.try_recv().ok()
    }

    pub fn send_command(&self, cmd: PanelCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn preset_action(&self, node: NodeId, action: PresetAction) {
        let _ = self.cmd_tx.send(PanelCommand::Preset { node, action });
    }

    pub fn group_action(&self, action: GroupAction) {
        let _ = self.cmd_tx.send(PanelCommand::Groups(action));
    }

    pub fn refresh(&self) {
        let _ = self.cmd_tx.send(PanelCommand::Refresh);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(PanelCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_round_trip() {
        let (bridge, cmd_rx, msg_tx) = PanelBridge::new();

        bridge.preset_action(NodeId(1), PresetAction::Add);
        bridge.refresh();
        assert!(matches!(
            cmd_rx.try_recv().unwrap(),
            PanelCommand::Preset {
                node: NodeId(1),
                action: PresetAction::Add
            }
        ));
        assert!(matches!(cmd_rx.try_recv().unwrap(), PanelCommand::Refresh));

        msg_tx
            .send(PanelMessage::PresetApplied { index: 2, missing: 0 })
            .unwrap();
        let msgs = bridge.drain();
        assert_eq!(msgs.len(), 1);
        assert!(matches!(
            msgs[0],
            PanelMessage::PresetApplied { index: 2, missing: 0 }
        ));
    }
}
