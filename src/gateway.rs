//! HTTP client gateway for the upstream stats API.
//!
//! One GET per call: no retries, no backoff, no pagination. The caller
//! is responsible for percent-encoding any identifier embedded in the
//! path. Every failure mode (network error, non-success status,
//! non-JSON body) comes back as an [`IngestError::Upstream`] value;
//! the gateway never panics.

use reqwest::header;

use crate::config::AppConfig;
use crate::domain::Payload;
use crate::error::IngestError;

/// Client for the upstream game-statistics REST API.
///
/// Holds a [`reqwest::Client`] with the bearer-token and `Accept`
/// headers applied to every request.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ApiGateway {
    /// Builds a gateway from the service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Internal`] if the API token is not a
    /// valid header value or the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, IngestError> {
        let mut headers = header::HeaderMap::new();
        let bearer = format!("Bearer {}", config.api_token);
        let mut auth = header::HeaderValue::from_str(&bearer)
            .map_err(|e| IngestError::Internal(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| IngestError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issues a single GET to `base_url + path` and decodes the body.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Upstream`] on network failure, a
    /// non-success HTTP status, or a body that does not parse as JSON.
    pub async fn fetch(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Payload, IngestError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(params) = query {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IngestError::Upstream(format!("request to {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(IngestError::Upstream(format!(
                "{path} returned HTTP {status}: {body}"
            )));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| IngestError::Upstream(format!("{path} returned non-JSON body: {e}")))?;

        tracing::debug!(path, "upstream fetch succeeded");
        Ok(Payload::decode(value))
    }
}
