//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Something the sweeper can purge of expired entries.
pub trait Sweep: Send + Sync + 'static {
    /// Removes every expired entry and returns how many were removed.
    fn sweep(&self) -> usize;
}

/// Spawns a background task that periodically sweeps expired entries.
///
/// The first sweep happens one full `period` after spawning. A period too
/// large to schedule leaves the task idle until shutdown. Ticks missed
/// while a sweep or the lock holder runs long are skipped, not replayed.
///
/// The task exits when `shutdown` flips to `true`, when its sender is
/// dropped, or when `target` has been dropped. It holds only a weak
/// reference, so it never keeps a cache alive.
///
/// # Arguments
/// * `target` - Weak reference to the structure to sweep
/// * `period` - Interval between sweeps, must be non-zero
/// * `shutdown` - Receiver observed on every tick
///
/// # Returns
/// A JoinHandle that resolves once the loop has exited.
pub fn spawn_sweeper_task<S: Sweep>(
    target: Weak<S>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting expiration sweeper with interval of {}ms",
            period.as_millis()
        );

        let Some(start) = Instant::now().checked_add(period) else {
            warn!(
                "Sweep interval of {}s cannot be scheduled; expiration sweeps disabled",
                period.as_secs()
            );
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            info!("Expiration sweeper stopped");
            return;
        };

        let mut ticker = interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let Some(target) = target.upgrade() else {
                break;
            };
            let removed = target.sweep();
            drop(target);

            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }

        info!("Expiration sweeper stopped");
    })
}
