//! Background task removing expired pairing codes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ports::PairingRegistry;

/// Spawns a task that purges expired codes every `interval`.
///
/// Abort the returned handle to stop it.
pub fn spawn_code_sweeper(
    registry: Arc<dyn PairingRegistry>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = registry.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "Swept expired pairing codes");
            }
        }
    })
}
