//! HTTP implementation of [`Transport`] over `reqwest`.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::{ConfigError, TransportError};
use crate::orchestrator::{RawResponse, Transport};
use crate::types::AnalysisRequest;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Posts analysis requests as JSON to `<endpoint>/api/review`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the TLS backend cannot be initialised.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("critique/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url: settings.review_url() })
    }

    /// The fully resolved request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        request_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).ok();
        debug!(%request_id, status, bytes = text.len(), json = body.is_some(), "read response body");

        Ok(RawResponse { status, body })
    }
}
