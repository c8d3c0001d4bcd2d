// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by the `serve` and `campaign` commands.

use std::sync::Arc;

use callcast_campaign::{DispatchSettings, Dispatcher};
use callcast_config::CallcastConfig;
use callcast_config::model::TenancyConfig;
use callcast_core::types::Tenant;
use callcast_core::{CallcastError, TenantDirectory};
use callcast_ingest::{CallEventNormalizer, TenantResolver};
use callcast_storage::SqliteStorage;
use callcast_vapi::VapiProvider;
use chrono::{SecondsFormat, Utc};
use tracing::info;

/// Initialized adapters and engines.
pub struct Services {
    pub storage: Arc<SqliteStorage>,
    pub dispatcher: Arc<Dispatcher>,
    pub normalizer: Arc<CallEventNormalizer>,
}

/// Opens storage, provisions the default tenant, and builds the dispatcher
/// and normalizer on top of the configured calling provider.
pub async fn build_services(config: &CallcastConfig) -> Result<Services, CallcastError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    provision_default_tenant(storage.as_ref(), &config.tenancy).await?;

    let provider = Arc::new(VapiProvider::new(&config.provider)?);
    let dispatcher = Dispatcher::new(
        storage.clone(),
        provider,
        DispatchSettings::from(&config.dispatch),
    );

    let tenants = TenantResolver::new(storage.clone(), config.tenancy.default_tenant_id.clone());
    let normalizer = CallEventNormalizer::new(storage.clone(), tenants, &config.ingest);

    Ok(Services {
        storage,
        dispatcher: Arc::new(dispatcher),
        normalizer: Arc::new(normalizer),
    })
}

/// Creates the fallback tenant unless it already exists.
///
/// Returns whether a tenant was created.
pub async fn provision_default_tenant(
    directory: &dyn TenantDirectory,
    tenancy: &TenancyConfig,
) -> Result<bool, CallcastError> {
    if directory.get_tenant(&tenancy.default_tenant_id).await?.is_some() {
        return Ok(false);
    }

    directory
        .upsert_tenant(&Tenant {
            id: tenancy.default_tenant_id.clone(),
            name: tenancy.default_tenant_name.clone(),
            email: tenancy.default_tenant_email.clone(),
            is_active: true,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
        .await?;
    info!(tenant_id = %tenancy.default_tenant_id, "default tenant provisioned");
    Ok(true)
}
