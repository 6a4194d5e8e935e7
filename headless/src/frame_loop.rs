use crate::config::RunnerConfig;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use vault_core::{EntityId, NavSide, Playback, Vault, VaultEvent};

/// Input forwarded from a host (or a scripted sweeper) to the frame loop
#[derive(Debug)]
pub enum FrameCommand {
    /// Pointer position in viewport pixels
    PointerMoved { x: f64, y: f64 },
    PointerNdc { ndc: [f64; 2] },
    Click,
    HoverEnter(NavSide),
    HoverLeave,
    Start,
    Resize { width: f64, height: f64 },
    Snapshot {
        response: oneshot::Sender<VaultSnapshot>,
    },
    Shutdown,
}

/// Per-card state at the time of a snapshot
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    pub id: EntityId,
    pub name: String,
    pub y_offset: f64,
    pub scale: f64,
    pub glow_front: f64,
    pub glow_back: f64,
}

/// Read-only view of the loop state
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSnapshot {
    pub tick: u64,
    pub time: f64,
    pub yaw: f64,
    pub picked: Option<EntityId>,
    pub label: Option<String>,
    pub active_audio: Option<Playback>,
    pub cards: Vec<CardSnapshot>,
}

impl VaultSnapshot {
    fn capture(vault: &Vault, tick: u64) -> Self {
        Self {
            tick,
            time: vault.time(),
            yaw: vault.rotation().yaw(),
            picked: vault.picked(),
            label: vault.label().map(str::to_string),
            active_audio: vault.active_audio().cloned(),
            cards: vault
                .registry()
                .iter()
                .map(|e| CardSnapshot {
                    id: e.id(),
                    name: e.name().to_string(),
                    y_offset: e.y_offset(),
                    scale: e.scale(),
                    glow_front: e.glow_front(),
                    glow_back: e.glow_back(),
                })
                .collect(),
        }
    }
}

/// Run the fixed-rate frame loop. Owns the vault and returns it when the loop ends.
///
/// Elapsed time is derived from the tick count, so a run is deterministic for a
/// given command sequence. The loop ends on `Shutdown`, when the command channel
/// closes, or after `max_ticks`.
pub async fn run_frame_loop(
    mut cmd_rx: mpsc::Receiver<FrameCommand>,
    event_tx: broadcast::Sender<VaultEvent>,
    config: RunnerConfig,
    mut vault: Vault,
) -> Vault {
    let dt = config.tick_dt();
    let mut camera = config.camera;
    vault.set_viewport(config.viewport_width, config.viewport_height);

    let mut tick_count: u64 = 0;
    let mut tick_interval = tokio::time::interval(Duration::from_secs_f64(dt));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        "Frame loop started at {} Hz with {} cards",
        config.tick_rate_hz,
        vault.registry().len()
    );

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                if config.max_ticks.is_some_and(|max| tick_count >= max) {
                    break;
                }
                vault.tick(tick_count as f64 * dt, &camera);
                tick_count += 1;

                for event in vault.drain_events() {
                    // No subscribers is fine.
                    let _ = event_tx.send(event);
                }
            }

            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    break;
                };
                match cmd {
                    FrameCommand::PointerMoved { x, y } => vault.pointer_moved(x, y),
                    FrameCommand::PointerNdc { ndc } => vault.set_pointer_ndc(ndc),
                    FrameCommand::Click => vault.click(vault.time()),
                    FrameCommand::HoverEnter(side) => vault.hover_enter(side),
                    FrameCommand::HoverLeave => vault.hover_leave(),
                    FrameCommand::Start => vault.mark_started(),
                    FrameCommand::Resize { width, height } => {
                        camera.set_viewport(width, height);
                        vault.set_viewport(width, height);
                    }
                    FrameCommand::Snapshot { response } => {
                        let _ = response.send(VaultSnapshot::capture(&vault, tick_count));
                    }
                    FrameCommand::Shutdown => break,
                }
                // Click events go out without waiting for the next tick.
                for event in vault.drain_events() {
                    let _ = event_tx.send(event);
                }
            }
        }
    }

    tracing::info!("Frame loop ended after {} ticks", tick_count);
    vault
}
