use async_trait::async_trait;
use bilim_core::TokenUsage;
use bilim_error::{BilimResult, Service, ServiceError, ServiceErrorKind};
use bilim_interface::{TextDriver, TextResponse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Request body for `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
}

impl AnthropicRequest {
    /// Creates a request with a single user-role prompt.
    pub fn user_prompt(
        model: impl Into<String>,
        max_tokens: u32,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// "user" or "assistant"
    pub role: String,
    /// Plain-text content
    pub content: String,
}

/// Response body of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, derive_getters::Getters)]
pub struct AnthropicResponse {
    id: String,
    content: Vec<AnthropicContentBlock>,
    usage: AnthropicUsage,
}

impl AnthropicResponse {
    /// Text of every text block, concatenated.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect()
    }
}

/// Content block of a response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContentBlock {
    /// Generated text
    Text {
        /// The text
        text: String,
    },
    /// Any block type this client does not use
    #[serde(other)]
    Other,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnthropicUsage {
    /// Prompt tokens
    pub input_tokens: u64,
    /// Generated tokens
    pub output_tokens: u64,
}

impl From<AnthropicUsage> for TokenUsage {
    fn from(usage: AnthropicUsage) -> Self {
        TokenUsage::new(usage.input_tokens, usage.output_tokens)
    }
}

/// Anthropic API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        debug!("Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Points the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sends a request to the Anthropic API.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn generate_anthropic(
        &self,
        request: &AnthropicRequest,
    ) -> BilimResult<AnthropicResponse> {
        debug!("Sending request to Anthropic API");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                ServiceError::new(ServiceErrorKind::Request {
                    service: Service::Anthropic,
                    message: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Anthropic API returned error");
            return Err(ServiceError::new(ServiceErrorKind::Status {
                service: Service::Anthropic,
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let anthropic_response: AnthropicResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ServiceError::new(ServiceErrorKind::Decode {
                service: Service::Anthropic,
                message: e.to_string(),
            })
        })?;

        debug!(response_id = %anthropic_response.id(), "Received response from Anthropic");
        Ok(anthropic_response)
    }
}

#[async_trait]
impl TextDriver for AnthropicClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, max_tokens: u32) -> BilimResult<TextResponse> {
        let request = AnthropicRequest::user_prompt(&self.model, max_tokens, prompt);
        let response = self.generate_anthropic(&request).await?;

        Ok(TextResponse {
            text: response.text(),
            usage: (*response.usage()).into(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
