use super::models::{SendPhotoRequestBuilder, TelegramEnvelope, TelegramMessage, TelegramUpdate};
use bilim_error::{BilimResult, HttpError, Service, ServiceError, ServiceErrorKind};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Extra time granted to a long-poll request beyond its server-side timeout.
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
///
/// Sends are retried on transient failures (connection errors, 429, 5xx) at
/// a fixed interval for a bounded number of attempts.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    token: String,
    base_url: String,
    send_retries: usize,
    retry_interval: Duration,
}

impl TelegramClient {
    /// Creates a client for the bot identified by `token`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(token: impl Into<String>, connect_timeout: Duration) -> BilimResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build Telegram HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            base_url: TELEGRAM_API_URL.to_string(),
            send_retries: 3,
            retry_interval: Duration::from_secs(5),
        })
    }

    /// Points the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets how often, and how far apart, transient send failures are retried.
    pub fn with_retries(mut self, send_retries: usize, retry_interval: Duration) -> Self {
        self.send_retries = send_retries;
        self.retry_interval = retry_interval;
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Sends a photo by URL with a caption, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// permanent error (e.g. the API rejected the chat id).
    #[instrument(skip(self, photo, caption), fields(caption_len = caption.len()))]
    pub async fn send_photo(
        &self,
        chat_id: &str,
        photo: &str,
        caption: &str,
    ) -> BilimResult<TelegramMessage> {
        let request = SendPhotoRequestBuilder::default()
            .chat_id(chat_id)
            .photo(photo)
            .caption(caption)
            .build()
            .map_err(|e| HttpError::new(format!("Invalid sendPhoto request: {}", e)))?;

        let strategy = FixedInterval::from_millis(self.retry_interval.as_millis() as u64)
            .take(self.send_retries);
        let request = &request;

        Retry::spawn(strategy, || async move {
            let builder = self.client.post(self.method_url("sendPhoto")).json(request);
            match self.execute::<TelegramMessage>(builder).await {
                Ok(message) => Ok(message),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "sendPhoto failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await
    }

    /// Long-polls for updates after `offset`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports a failure.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> BilimResult<Vec<TelegramUpdate>> {
        let mut query = vec![("timeout", timeout.as_secs().to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let builder = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&query)
            .timeout(timeout + LONG_POLL_GRACE);

        let updates = self.execute::<Vec<TelegramUpdate>>(builder).await?;
        debug!(count = updates.len(), "Received updates");
        Ok(updates)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> BilimResult<T> {
        let response = builder.send().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Request {
                service: Service::Telegram,
                // Strip the URL, it embeds the bot token.
                message: e.without_url().to_string(),
            })
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Request {
                service: Service::Telegram,
                message: e.without_url().to_string(),
            })
        })?;

        let envelope: TelegramEnvelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(ServiceError::new(ServiceErrorKind::Decode {
                    service: Service::Telegram,
                    message: e.to_string(),
                })
                .into());
            }
            Err(_) => {
                return Err(ServiceError::new(ServiceErrorKind::Status {
                    service: Service::Telegram,
                    status: status.as_u16(),
                    message: body,
                })
                .into());
            }
        };

        match envelope {
            TelegramEnvelope {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            TelegramEnvelope { ok: true, .. } => {
                Err(ServiceError::new(ServiceErrorKind::EmptyResponse(Service::Telegram)).into())
            }
            TelegramEnvelope {
                description,
                error_code,
                ..
            } => {
                let message = description.unwrap_or_else(|| "no description".to_string());
                let code = error_code.unwrap_or(status.as_u16());
                let kind = if code == 429 || code >= 500 {
                    ServiceErrorKind::Status {
                        service: Service::Telegram,
                        status: code,
                        message,
                    }
                } else {
                    ServiceErrorKind::Rejected {
                        service: Service::Telegram,
                        message,
                    }
                };
                Err(ServiceError::new(kind).into())
            }
        }
    }
}
