//! Background tasks for the advisor server.
//!
//! Includes:
//! - Evicting idle call sessions and stale tombstones.
//! - Purging expired audio clips.

use crate::AppState;
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// How long an ended call id keeps absorbing late callbacks.
const TOMBSTONE_TTL: Duration = Duration::from_secs(3600);

/// Starts the session reaper task.
///
/// Runs indefinitely. Calls whose gateway went quiet (no status callback
/// ever arrived) are evicted after the idle timeout so they cannot pin
/// memory.
pub async fn start_reaper_task(state: Arc<AppState>) {
    let settings = state.sessions_config.clone();
    if settings.reaper_interval_seconds == 0 {
        tracing::warn!("session reaper disabled (interval=0)");
        return;
    }

    let interval = Duration::from_secs(settings.reaper_interval_seconds);
    let idle_timeout = Duration::from_secs(settings.idle_timeout_seconds);

    tracing::info!(
        interval_seconds = settings.reaper_interval_seconds,
        idle_timeout_seconds = settings.idle_timeout_seconds,
        "starting session reaper task"
    );

    loop {
        sleep(interval).await;
        sweep(&state, idle_timeout);
    }
}

/// One reaper pass.
pub fn sweep(state: &AppState, idle_timeout: Duration) {
    let (evicted, forgotten) = state.sessions.reap(idle_timeout, TOMBSTONE_TTL);
    let purged = state.clips.purge_expired();

    if evicted > 0 || forgotten > 0 || purged > 0 {
        tracing::info!(
            evicted_sessions = evicted,
            forgotten_tombstones = forgotten,
            purged_clips = purged,
            active_calls = state.sessions.active_calls(),
            "reaper pass finished"
        );
    }
}
