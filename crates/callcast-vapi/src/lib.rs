// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vapi calling provider adapter for callcast.
//!
//! Implements [`CallProvider`] on top of the Vapi `POST /call` endpoint.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use callcast_config::model::ProviderConfig;
use callcast_core::error::CallcastError;
use callcast_core::traits::{CallProvider, PluginAdapter};
use callcast_core::types::{AdapterType, CallRequest, HealthStatus, PlacedCall};
use secrecy::SecretString;
use tracing::info;

use crate::client::VapiClient;
use crate::types::{AssistantOverrides, CreateCallRequest, Customer};

/// Environment variable consulted when `provider.api_key` is unset.
pub const API_KEY_ENV: &str = "VAPI_API_KEY";

/// Vapi provider implementing [`CallProvider`].
///
/// API key resolution order: config -> `VAPI_API_KEY` env var -> error.
pub struct VapiProvider {
    client: VapiClient,
}

impl VapiProvider {
    /// Creates a new Vapi provider from the provider configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self, CallcastError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = VapiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(base_url = %config.base_url, "Vapi provider initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for VapiProvider {
    fn name(&self) -> &str {
        "vapi"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::CallProvider
    }

    async fn health_check(&self) -> Result<HealthStatus, CallcastError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CallcastError> {
        Ok(())
    }
}

#[async_trait]
impl CallProvider for VapiProvider {
    async fn create_call(&self, request: &CallRequest) -> Result<PlacedCall, CallcastError> {
        let body = CreateCallRequest {
            assistant_id: request.assistant_id.clone(),
            phone_number_id: request.phone_number_id.clone(),
            customer: Customer {
                number: request.customer_number.clone(),
            },
            assistant_overrides: AssistantOverrides {
                variable_values: request.variables.clone(),
            },
        };
        let call_id = self.client.create_call(&body).await?;
        Ok(PlacedCall { call_id })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<SecretString, CallcastError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(SecretString::from(key.clone()));
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| {
            CallcastError::Config(format!(
                "Vapi API key not found. Set provider.api_key in config or {API_KEY_ENV} environment variable."
            ))
        })
}
