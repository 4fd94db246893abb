//! Fixed-cadence frame loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, trace};

use super::SessionController;

/// Tick the session at `frame_rate_hz` until the task is aborted.
///
/// The measured wall-clock delta is handed to the session unmodified; the
/// session's frame clock sanitizes and caps it. Late ticks are skipped, not
/// replayed in a burst.
pub fn spawn_frame_loop(controller: Arc<SessionController>, frame_rate_hz: u32) -> JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / f64::from(frame_rate_hz.max(1)));

    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(frame_rate_hz, "Frame loop started");

        let mut last = Instant::now();
        loop {
            interval.tick().await;
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;

            let report = controller.tick(dt).await;
            if report.near_npc_changed {
                trace!(frame_dt = dt, "Player proximity to NPC changed");
            }
        }
    })
}
