//! Pull transport: a long-poll loop over `getUpdates`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::time::{sleep, Duration};
use tracing::{error, info};

use crate::dispatch::process_update;
use crate::telegram::LONG_POLL_TIMEOUT_SECS;
use crate::AppState;

/// How long to back off after a failed `getUpdates` call before retrying.
const FETCH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Run the long-poll loop until the process shuts down.
///
/// Updates queued at the platform before this run started are discarded
/// first, so a restart never replays stale button presses. Each update is
/// handled in its own task; per-user ordering of cart and ticket mutations
/// is preserved by the session lock.
pub async fn polling_loop(state: Arc<AppState>) -> Result<()> {
    // deleteWebhook also drops the pending backlog, and clears any webhook
    // left over from a previous push-mode run that would block getUpdates.
    state
        .telegram
        .delete_webhook(true)
        .await
        .context("Failed to discard pending updates before polling")?;

    info!("Long polling started");

    let mut offset: Option<i64> = None;
    loop {
        match state.telegram.get_updates(offset, LONG_POLL_TIMEOUT_SECS).await {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    let state = state.clone();
                    tokio::spawn(async move {
                        process_update(state, update).await;
                    });
                }
            }
            Err(e) => {
                error!("Failed to fetch updates: {e:#}");
                sleep(FETCH_RETRY_DELAY).await;
            }
        }
    }
}
