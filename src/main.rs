//! flowstate demo driver.
//!
//! Builds a small sample graph (two grouped stages plus a preset switch),
//! spawns the state runtime on its own thread, and walks through a typical
//! session: capture two presets, toggle a group, switch back, shut down.

use anyhow::Context;
use flowstate::graph::{GraphContext, GraphNode, NodeGroup, GroupId, NodeId, NodeKind, Widget};
use flowstate::group::GroupPanelConfig;
use flowstate::mode::Mode;
use flowstate::{
    GroupAction, PanelBridge, PanelMessage, PresetAction, StateRuntime,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn build_sample_graph() -> (GraphContext, NodeId) {
    let mut graph = GraphContext::new();

    for (i, title) in ["Loaders", "Samplers"].iter().enumerate() {
        let y = i as f32 * 300.0;
        graph.add_group(
            NodeGroup::new(GroupId::INVALID, *title)
                .at(0.0, y)
                .sized(400.0, 250.0),
        );
        for j in 0..2 {
            graph.insert_node(
                GraphNode::new(NodeId::INVALID, format!("{title} {j}"), NodeKind::Plain)
                    .at(40.0 + j as f32 * 180.0, y + 60.0),
            );
        }
    }

    let switch = graph.insert_node(
        GraphNode::new(NodeId::INVALID, "Preset Switch", NodeKind::PresetSwitch)
            .at(600.0, 0.0)
            .with_widget(Widget::number("preset_index", 0.0))
            .with_input("preset_index", None),
    );

    (graph, switch)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flowstate=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting flowstate demo");

    let (graph, switch) = build_sample_graph();

    let (bridge, cmd_rx, msg_tx) = PanelBridge::new();
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let handle = std::thread::spawn(move || {
        let mut runtime = StateRuntime::new(
            graph,
            GroupPanelConfig::default(),
            30,
            cmd_rx,
            msg_tx,
            running_clone,
        );
        runtime.run();
    });

    // Capture the all-enabled state as preset 0, then a bypassed variant.
    bridge.preset_action(switch, PresetAction::Add);
    bridge.group_action(GroupAction::SetRowState {
        row: 1,
        state: Mode::Bypassed,
    });
    bridge.preset_action(switch, PresetAction::Add);
    bridge.preset_action(switch, PresetAction::Rename("Samplers off".to_string()));

    // Back to the original state via cyclic navigation.
    bridge.preset_action(switch, PresetAction::Prev);

    std::thread::sleep(Duration::from_millis(200));

    for msg in bridge.drain() {
        match msg {
            PanelMessage::PresetRows { rows, .. } => {
                println!("preset browser:");
                for row in rows {
                    let marker = if row.selected { ">" } else { " " };
                    println!("  {marker} {}", row.label);
                }
            }
            PanelMessage::GroupRows(views) => {
                println!("groups:");
                for view in views {
                    println!("  [{}] {}", view.state, view.title);
                }
            }
            PanelMessage::PresetApplied { index, missing } => {
                println!("applied preset {index} ({missing} missing)");
            }
            PanelMessage::PresetNotFound(index) => {
                println!("no preset at index {index}");
            }
            other => tracing::debug!(?other, "message"),
        }
    }

    bridge.shutdown();
    running.store(false, Ordering::Relaxed);
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("runtime thread panicked"))
        .context("joining runtime thread")?;

    tracing::info!("flowstate demo finished");
    Ok(())
}
