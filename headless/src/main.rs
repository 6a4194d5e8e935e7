use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vault_core::{manifest_from_env, Vault, VaultConfig, VaultError, VaultEvent};
use vault_headless::config::RunnerConfig;
use vault_headless::frame_loop::{run_frame_loop, FrameCommand};
use vault_headless::sweep::PointerSweep;

/// Seconds for one sweep across the viewport
const SWEEP_PERIOD: f64 = 6.0;

fn build_vault() -> Result<Vault, VaultError> {
    let config = VaultConfig::from_env()?;
    let sources = manifest_from_env()?;
    Vault::new(config, &sources)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let runner_config = RunnerConfig {
        max_ticks: std::env::var("VAULT_TICKS")
            .ok()
            .and_then(|v| v.parse().ok()),
        ..Default::default()
    };
    if let Err(e) = runner_config.validate() {
        eprintln!("Invalid runner configuration: {}", e);
        std::process::exit(1);
    }

    let vault = match build_vault() {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("Failed to set up vault: {}", e);
            std::process::exit(1);
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<FrameCommand>(256);
    let (event_tx, mut event_rx) = broadcast::channel::<VaultEvent>(runner_config.event_capacity);

    // Print events as JSON lines
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!("Failed to encode event: {}", e),
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event printer lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let dt = runner_config.tick_dt();
    let mut rng = ChaCha8Rng::seed_from_u64(runner_config.rng_seed);
    let mut sweep = PointerSweep::new(
        runner_config.viewport_width,
        runner_config.viewport_height,
        SWEEP_PERIOD,
        &mut rng,
    );

    let loop_handle = tokio::spawn(run_frame_loop(
        cmd_rx,
        event_tx,
        runner_config,
        vault,
    ));

    let _ = cmd_tx.send(FrameCommand::Start).await;

    // Drive the sweeper until the loop stops or ctrl-c.
    let mut sweep_interval = tokio::time::interval(Duration::from_secs_f64(dt));
    loop {
        tokio::select! {
            _ = sweep_interval.tick() => {
                let mut closed = false;
                for cmd in sweep.tick(dt, &mut rng) {
                    if cmd_tx.send(cmd).await.is_err() {
                        closed = true;
                        break;
                    }
                }
                if closed {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                let (response, snapshot_rx) = oneshot::channel();
                if cmd_tx.send(FrameCommand::Snapshot { response }).await.is_ok() {
                    if let Ok(snapshot) = snapshot_rx.await {
                        match serde_json::to_string_pretty(&snapshot) {
                            Ok(json) => println!("{}", json),
                            Err(e) => tracing::warn!("Failed to encode snapshot: {}", e),
                        }
                    }
                }
                let _ = cmd_tx.send(FrameCommand::Shutdown).await;
                break;
            }
        }
    }

    drop(cmd_tx);
    match loop_handle.await {
        Ok(vault) => tracing::info!(
            "Finished at t={:.2}s, label {:?}",
            vault.time(),
            vault.label()
        ),
        Err(e) => tracing::warn!("Frame loop task failed: {}", e),
    }
}
