//! Background expiry of idle sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::clock::Clock;
use super::store::SessionStore;

/// Spawn a task that calls [`SessionStore::sweep_expired`] every `every`.
///
/// The first sweep runs immediately. The loop ends when `cancel` fires;
/// otherwise it lives until the runtime shuts down.
pub fn spawn_sweeper<C>(
    store: Arc<SessionStore<C>>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    C: Clock + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("session sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = store.sweep_expired();
                    if removed > 0 {
                        tracing::info!(removed, remaining = store.len(), "removed expired sessions");
                    }
                }
            }
        }
    })
}
