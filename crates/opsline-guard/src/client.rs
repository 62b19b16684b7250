// SPDX-FileCopyrightText: 2026 Opsline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the external completion service.
//!
//! Implements [`CompletionProvider`] over a simple JSON POST. The wire
//! format, prompt text, and model selection live entirely behind this
//! adapter; nothing upstream depends on them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use opsline_core::{Completion, CompletionProvider, CompletionRequest, OpslineError};

/// HTTP client for completion-service communication.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CompletionClient {
    /// Create a new completion client.
    ///
    /// The timeout bounds every call; a hung service call surfaces as
    /// [`OpslineError::Timeout`] and must never block unrelated requests.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, OpslineError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        let mut auth_value = HeaderValue::from_str(&bearer)
            .map_err(|e| OpslineError::Config(format!("invalid completion api_key: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert("authorization", auth_value);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| OpslineError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

#[async_trait]
impl CompletionProvider for CompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, OpslineError> {
        let url = format!("{}/v1/replies", self.base_url);
        debug!(url = url.as_str(), history_len = request.history.len(), "completion request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OpslineError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    OpslineError::Provider {
                        message: format!("completion request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpslineError::Provider {
                message: format!("completion service returned {status}: {body}"),
                source: None,
            });
        }

        response
            .json::<Completion>()
            .await
            .map_err(|e| OpslineError::Provider {
                message: format!("malformed completion response: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
