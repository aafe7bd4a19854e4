use async_trait::async_trait;
use bilim_error::{BilimResult, Service, ServiceError, ServiceErrorKind};
use bilim_interface::{Photo, PhotoSearch};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

const PEXELS_API_URL: &str = "https://api.pexels.com";

/// Number of results requested per search.
pub const DEFAULT_PER_PAGE: u32 = 15;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

/// Pexels photo search client.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    client: Client,
    api_key: String,
    base_url: String,
    per_page: u32,
}

impl PexelsClient {
    /// Creates a client authenticating with `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: PEXELS_API_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Points the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the number of results requested per search.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> BilimResult<Vec<Photo>> {
        let per_page = self.per_page.to_string();
        let response = self
            .client
            .get(format!("{}/v1/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
                ("size", "large"),
                ("locale", "en-US"),
            ])
            .send()
            .await
            .map_err(|e| {
                ServiceError::new(ServiceErrorKind::Request {
                    service: Service::Pexels,
                    message: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Pexels search failed");
            return Err(ServiceError::new(ServiceErrorKind::Status {
                service: Service::Pexels,
                status: status.as_u16(),
                message: body,
            })
            .into());
        }

        let body: SearchResponse = response.json().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Decode {
                service: Service::Pexels,
                message: e.to_string(),
            })
        })?;

        debug!(results = body.photos.len(), "Pexels search completed");
        Ok(body.photos)
    }
}
