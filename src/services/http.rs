/*!
 * HTTP client for the cipher and share services.
 *
 * - `POST {endpoint}/cipher/{encode|decode}` with `{"original": text}`
 * - `GET {endpoint}/share/{id}`
 *
 * Response interpretation is kept in free functions over (status, body)
 * so it can be exercised without a server.
 */

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::ServiceError;
use crate::services::{ShareResolver, Transformer};
use crate::session::models::{ShareSnapshot, TransformOutcome, TransformRequest};

/// Request body for the cipher endpoints
#[derive(Debug, Serialize)]
pub struct CipherRequest<'a> {
    pub original: &'a str,
}

/// Successful cipher response
#[derive(Debug, Deserialize)]
pub struct CipherResponse {
    pub result: String,
}

/// Error payload used by both services
#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Client for the cipher service and its share endpoint
#[derive(Debug, Clone)]
pub struct HttpCipherClient {
    /// Base URL of the service
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
}

impl HttpCipherClient {
    /// Create a new client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of the cipher endpoint for a request
    pub fn cipher_url(&self, request: &TransformRequest) -> String {
        format!("{}/cipher/{}", self.endpoint, request.direction.endpoint_name())
    }

    /// URL of the share endpoint for an id
    ///
    /// The id is pushed as a single escaped path segment.
    pub fn share_url(&self, id: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ServiceError::RequestFailed(format!("Invalid service URL {}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::RequestFailed(format!("Service URL cannot take a path: {}", self.endpoint)))?
            .pop_if_empty()
            .push("share")
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl Transformer for HttpCipherClient {
    async fn transform(&self, request: &TransformRequest) -> Result<TransformOutcome, ServiceError> {
        let url = self.cipher_url(request);
        debug!("POST {} (request #{})", url, request.seq);

        let response = self
            .client
            .post(&url)
            .json(&CipherRequest {
                original: &request.original_text,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        interpret_cipher_response(status, &body)
    }
}

#[async_trait]
impl ShareResolver for HttpCipherClient {
    async fn resolve(&self, id: &str) -> Result<ShareSnapshot, ServiceError> {
        let url = self.share_url(id)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        interpret_share_response(status, &body, id)
    }
}

/// Turn a cipher endpoint reply into an outcome
///
/// A body carrying `"error": true` is a rejection regardless of status.
pub fn interpret_cipher_response(status: StatusCode, body: &str) -> Result<TransformOutcome, ServiceError> {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if payload.error {
            return Ok(TransformOutcome::Rejected {
                message: payload.message.unwrap_or_else(|| "Invalid input".to_string()),
            });
        }
    }

    if !status.is_success() {
        warn!("Cipher service error ({}): {}", status, body);
        return Err(ServiceError::ApiError {
            status_code: status.as_u16(),
            message: body.to_string(),
        });
    }

    let parsed: CipherResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::ParseError(e.to_string()))?;
    Ok(TransformOutcome::Transformed(parsed.result))
}

/// Turn a share endpoint reply into a snapshot
pub fn interpret_share_response(status: StatusCode, body: &str, id: &str) -> Result<ShareSnapshot, ServiceError> {
    if status == StatusCode::NOT_FOUND {
        let message = serde_json::from_str::<ErrorPayload>(body)
            .ok()
            .and_then(|payload| payload.message)
            .unwrap_or_else(|| format!("Share {} not found", id));
        return Err(ServiceError::NotFound(message));
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorPayload>(body)
            .ok()
            .and_then(|payload| payload.message)
            .unwrap_or_else(|| body.to_string());
        warn!("Share service error ({}): {}", status, message);
        return Err(ServiceError::ApiError {
            status_code: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(body).map_err(|e| ServiceError::ParseError(e.to_string()))
}
