// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Vapi call API.
//!
//! Provides [`VapiClient`] which handles request construction and bearer
//! authentication. Calls are never retried: a transport error after the
//! provider accepted the call is indistinguishable from a rejection.

use std::time::Duration;

use callcast_core::CallcastError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, CreateCallRequest, CreateCallResponse};

/// HTTP client for Vapi API communication.
#[derive(Debug, Clone)]
pub struct VapiClient {
    client: reqwest::Client,
    base_url: String,
}

impl VapiClient {
    /// Creates a new client authenticating with `api_key` against `base_url`.
    pub fn new(
        api_key: &SecretString,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CallcastError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| CallcastError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CallcastError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Places an outbound call and returns the provider call id.
    ///
    /// Any non-2xx status, transport failure, or 2xx body without an `id`
    /// is an error.
    pub async fn create_call(&self, request: &CreateCallRequest) -> Result<String, CallcastError> {
        let url = format!("{}/call", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CallcastError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, customer = %request.customer.number, "create call response received");

        let body = response.text().await.map_err(|e| CallcastError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("Vapi API error ({status}): {}", api_err.describe()),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(CallcastError::Provider {
                message,
                source: None,
            });
        }

        let created: CreateCallResponse =
            serde_json::from_str(&body).map_err(|e| CallcastError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        created
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CallcastError::Provider {
                message: "API response did not contain a call id".into(),
                source: None,
            })
    }
}
