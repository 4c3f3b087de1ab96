//! Background expiry of sessions nobody touches any more.

use std::time::Duration;

use marpele_core::error::GameError;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use crate::state::AppState;

/// Destroys every session idle for longer than `idle_timeout` and returns how
/// many were removed. A session that sees activity between listing and
/// removal is kept.
///
/// # Errors
///
/// Returns `GameError::Infrastructure` if the timeout does not fit a
/// timestamp or the registry is unusable.
pub async fn sweep_idle(state: &AppState, idle_timeout: Duration) -> Result<usize, GameError> {
    let now = state.clock.now();
    let cutoff = chrono::Duration::from_std(idle_timeout)
        .ok()
        .and_then(|timeout| now.checked_sub_signed(timeout))
        .ok_or_else(|| {
            GameError::Infrastructure(format!(
                "idle timeout of {}s reaches before the earliest timestamp",
                idle_timeout.as_secs()
            ))
        })?;

    let mut removed = 0;
    for context_id in state.registry.idle_since(cutoff).await? {
        if state.registry.expire_if_idle(context_id, cutoff).await? {
            info!(%context_id, "expired idle session");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Starts the periodic sweep, or returns `None` when expiry is disabled.
pub fn spawn_idle_sweeper(state: AppState) -> Option<JoinHandle<()>> {
    let idle_timeout = state.settings.idle_timeout()?;
    let period = state.settings.sweep_interval();

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        loop {
            ticker.tick().await;
            if let Err(e) = sweep_idle(&state, idle_timeout).await {
                warn!(error = %e, "idle sweep failed");
            }
        }
    }))
}
