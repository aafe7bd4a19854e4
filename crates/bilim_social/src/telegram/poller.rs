use super::{TelegramClient, TelegramUpdate};
use bilim_error::BilimResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Long-polls `getUpdates`, acknowledging every update it has seen.
///
/// The publisher does not act on inbound messages; polling keeps the bot's
/// update queue drained and doubles as a connectivity check.
#[derive(Debug)]
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    timeout: Duration,
    offset: Option<i64>,
}

impl UpdatePoller {
    /// Creates a poller holding each request open for up to `timeout`.
    pub fn new(client: Arc<TelegramClient>, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            offset: None,
        }
    }

    /// Offset sent with the next request.
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetches the next batch of updates and advances the offset past them.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; the offset is left unchanged.
    pub async fn poll(&mut self) -> BilimResult<Vec<TelegramUpdate>> {
        let updates = self.client.get_updates(self.offset, self.timeout).await?;

        if let Some(last) = updates.iter().map(|update| *update.update_id()).max() {
            self.offset = Some(last + 1);
            debug!(offset = last + 1, "Advanced update offset");
        }

        Ok(updates)
    }
}
