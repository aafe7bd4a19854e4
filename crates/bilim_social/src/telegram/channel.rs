use super::TelegramClient;
use async_trait::async_trait;
use bilim_error::BilimResult;
use bilim_interface::{Channel, MessageId};
use std::sync::Arc;
use tracing::{info, instrument};

/// Telegram chat or channel that facts are published to.
#[derive(Debug, Clone)]
pub struct TelegramChannel {
    client: Arc<TelegramClient>,
    chat_id: String,
}

impl TelegramChannel {
    /// Publishes to `chat_id` (numeric id or `@username`) through `client`.
    pub fn new(client: Arc<TelegramClient>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    #[instrument(skip(self, caption), fields(chat_id = %self.chat_id))]
    async fn publish_photo(&self, photo_url: &str, caption: &str) -> BilimResult<MessageId> {
        let message = self
            .client
            .send_photo(&self.chat_id, photo_url, caption)
            .await?;

        let id = MessageId(*message.message_id());
        info!(message_id = %id, "Published photo");
        Ok(id)
    }

    fn channel_name(&self) -> &str {
        &self.chat_id
    }
}
