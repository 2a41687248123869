// src/tasks/auto_refresh.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::controller::{LoadOutcome, RefreshController};

/// Spawns the one repeating refresh timer for the session.
///
/// Created once at startup and never duplicated: toggling auto-refresh only
/// flips the flag that [`RefreshController::tick`] checks. The first tick
/// fires one `period` after spawning. The task ends when `shutdown_rx` sees
/// `true` or its sender is dropped.
pub fn spawn_auto_refresh_task(
    controller: Arc<RefreshController>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Auto-refresh timer started ({} ms).", period.as_millis());
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match controller.tick().await {
                        LoadOutcome::Skipped => debug!("Auto-refresh tick skipped"),
                        outcome => debug!("Auto-refresh tick => {:?}", outcome),
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Auto-refresh timer stopped.");
    })
}
