//! The state runtime: a dedicated-thread tick loop around the engines.
//!
//! Each tick:
//! 1. Drain commands from the UI.
//! 2. Run the preset autodetection pass.
//! 3. Re-derive the group panel rows.
//! 4. Push row snapshots whose signature changed.
//! 5. Rate-limit to the configured Hz.
//!
//! Hosts with their own scheduler can skip `run()` and call [`StateRuntime::tick`]
//! from any periodic callback — every pass fully recomputes derived state
//! from ground truth, so missed or duplicated ticks are harmless.

use crate::bridge::{GroupAction, PanelCommand, PanelMessage, PresetAction};
use crate::graph::{GraphContext, NodeId, NodeKind};
use crate::group::{GroupPanel, GroupPanelConfig};
use crate::preset::{ApplyOutcome, PresetEngine};
use crate::view::{
    group_panel_signature, group_row_views, preset_panel_rows, preset_panel_signature,
};
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Drives the preset engine and group panel against a graph it owns.
pub struct StateRuntime {
    graph: GraphContext,
    engine: PresetEngine,
    panel: GroupPanel,
    tick_rate_hz: u32,
    running: Arc<AtomicBool>,
    cmd_rx: Receiver<PanelCommand>,
    msg_tx: Sender<PanelMessage>,
    /// Last pushed browser signature per switch node.
    preset_signatures: HashMap<NodeId, String>,
    /// Last pushed group panel signature.
    group_signature: String,
    last_tick_time: Option<Instant>,
}

impl StateRuntime {
    pub fn new(
        graph: GraphContext,
        config: GroupPanelConfig,
        tick_rate_hz: u32,
        cmd_rx: Receiver<PanelCommand>,
        msg_tx: Sender<PanelMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            graph,
            engine: PresetEngine::new(),
            panel: GroupPanel::new(config),
            tick_rate_hz,
            running,
            cmd_rx,
            msg_tx,
            preset_signatures: HashMap::new(),
            group_signature: String::new(),
            last_tick_time: None,
        }
    }

    pub fn graph(&self) -> &GraphContext {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphContext {
        &mut self.graph
    }

    pub fn engine(&self) -> &PresetEngine {
        &self.engine
    }

    pub fn panel(&self) -> &GroupPanel {
        &self.panel
    }

    /// Run until the running flag clears or a Shutdown command arrives.
    pub fn run(&mut self) {
        tracing::info!("state runtime thread started");

        while self.running.load(Ordering::Relaxed) {
            self.process_commands();
            self.tick();
            self.rate_limit();
        }

        let _ = self.msg_tx.send(PanelMessage::Shutdown);
        tracing::info!("state runtime thread exiting");
    }

    /// One full pass: autodetect preset switches, re-derive group rows, push
    /// changed snapshots. Idempotent.
    pub fn tick(&mut self) {
        self.engine.on_tick(&mut self.graph);
        self.panel.refresh(&self.graph);
        self.push_snapshots();
        if self.graph.take_dirty() {
            let _ = self.msg_tx.send(PanelMessage::Redraw);
        }
    }

    /// Drain and execute all pending commands.
    pub fn process_commands(&mut self) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            match cmd {
                PanelCommand::Preset { node, action } => self.handle_preset(node, action),
                PanelCommand::Groups(action) => self.handle_groups(action),
                PanelCommand::Refresh => {
                    self.panel.refresh(&self.graph);
                    self.push_snapshots();
                }
                PanelCommand::Shutdown => {
                    self.running.store(false, Ordering::Relaxed);
                }
            }
        }
    }

    fn handle_preset(&mut self, node: NodeId, action: PresetAction) {
        match action {
            PresetAction::Add => {
                let index = self.engine.add_preset(&mut self.graph, node);
                tracing::info!(%node, index, "added preset");
            }
            PresetAction::RecordCurrent => {
                let index = self.engine.record_current(&mut self.graph, node);
                tracing::info!(%node, index, "recorded current preset");
            }
            PresetAction::DeleteSelected => {
                match self.engine.delete_selected(&mut self.graph, node) {
                    Some(fallback) => tracing::info!(%node, fallback, "deleted preset"),
                    None => tracing::debug!(%node, "delete targeted an absent preset"),
                }
            }
            PresetAction::Prev => {
                self.engine.prev(&mut self.graph, node);
            }
            PresetAction::Next => {
                self.engine.next(&mut self.graph, node);
            }
            PresetAction::Switch(index) => {
                match self.engine.switch_to(&mut self.graph, node, index) {
                    ApplyOutcome::Applied { missing, .. } => {
                        let _ = self.msg_tx.send(PanelMessage::PresetApplied { index, missing });
                    }
                    ApplyOutcome::NotFound => {
                        let _ = self.msg_tx.send(PanelMessage::PresetNotFound(index));
                    }
                }
            }
            PresetAction::Rename(name) => {
                self.engine.rename_current(&mut self.graph, node, &name);
            }
        }
    }

    fn handle_groups(&mut self, action: GroupAction) {
        // Actions can arrive before the first periodic refresh has built rows.
        if self.panel.rows().is_empty() {
            self.panel.refresh(&self.graph);
        }
        match action {
            GroupAction::SetRowState { row, state } => {
                self.panel.set_row_state(&mut self.graph, row, state);
            }
            GroupAction::SetBatch(mode) => {
                self.panel.set_batch_state(&mut self.graph, mode);
            }
            GroupAction::Rename { row, title } => {
                self.panel.rename_group(&mut self.graph, row, &title);
            }
            GroupAction::Navigate(row) => {
                if let Some(target) = self.panel.row(row) {
                    let _ = self
                        .msg_tx
                        .send(PanelMessage::NavigateToGroup(target.group));
                }
            }
            GroupAction::SetConfig(config) => {
                self.panel.set_config(*config);
                self.panel.refresh(&self.graph);
            }
        }
    }

    /// Push row snapshots whose signature moved since the last push.
    fn push_snapshots(&mut self) {
        let switches: Vec<NodeId> = self
            .graph
            .nodes()
            .filter(|n| n.kind == NodeKind::PresetSwitch)
            .map(|n| n.id)
            .collect();

        for node in switches {
            let current = self.engine.current_index(&self.graph, node);
            let store = self.graph.preset_store_mut();
            let signature = preset_panel_signature(store, current);
            if self.preset_signatures.get(&node) != Some(&signature) {
                let rows = preset_panel_rows(store, current);
                self.preset_signatures.insert(node, signature);
                let _ = self.msg_tx.send(PanelMessage::PresetRows { node, rows });
            }
        }

        let signature = group_panel_signature(&self.graph, &self.panel);
        if signature != self.group_signature {
            let views = group_row_views(&self.graph, &self.panel);
            self.group_signature = signature;
            let _ = self.msg_tx.send(PanelMessage::GroupRows(views));
        }
    }

    fn rate_limit(&mut self) {
        if self.tick_rate_hz == 0 {
            std::thread::sleep(Duration::from_millis(10));
            return;
        }
        let target_interval = Duration::from_nanos(1_000_000_000 / self.tick_rate_hz as u64);
        if let Some(last) = self.last_tick_time {
            let elapsed = last.elapsed();
            if elapsed < target_interval {
                std::thread::sleep(target_interval - elapsed);
            }
        }
        self.last_tick_time = Some(Instant::now());
    }
}
