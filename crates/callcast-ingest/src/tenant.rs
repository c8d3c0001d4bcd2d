// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant attribution for ingested calls.

use std::sync::Arc;

use callcast_core::TenantDirectory;
use tracing::{debug, warn};

/// Where a resolved tenant id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    Assistant,
    PhoneNumber,
    Default,
}

/// Resolves the tenant owning a call: by assistant, then by phone number,
/// then the configured default tenant.
///
/// Resolution never fails. A directory error is logged and treated as no
/// match so the call is still captured.
#[derive(Clone)]
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    default_tenant_id: String,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, default_tenant_id: impl Into<String>) -> Self {
        Self {
            directory,
            default_tenant_id: default_tenant_id.into(),
        }
    }

    pub fn default_tenant_id(&self) -> &str {
        &self.default_tenant_id
    }

    /// Tenant id for a call with these provider-issued identifiers.
    pub async fn resolve(&self, assistant_id: Option<&str>, phone_number_id: Option<&str>) -> String {
        self.resolve_with_source(assistant_id, phone_number_id).await.0
    }

    pub async fn resolve_with_source(
        &self,
        assistant_id: Option<&str>,
        phone_number_id: Option<&str>,
    ) -> (String, TenantSource) {
        if let Some(id) = assistant_id {
            match self.directory.tenant_for_assistant(id).await {
                Ok(Some(tenant)) => {
                    debug!(assistant_id = id, tenant_id = %tenant, "tenant resolved by assistant");
                    return (tenant, TenantSource::Assistant);
                }
                Ok(None) => debug!(assistant_id = id, "no tenant for assistant"),
                Err(e) => warn!(assistant_id = id, error = %e, "assistant tenant lookup failed"),
            }
        }

        if let Some(id) = phone_number_id {
            match self.directory.tenant_for_phone_number(id).await {
                Ok(Some(tenant)) => {
                    debug!(phone_number_id = id, tenant_id = %tenant, "tenant resolved by phone number");
                    return (tenant, TenantSource::PhoneNumber);
                }
                Ok(None) => debug!(phone_number_id = id, "no tenant for phone number"),
                Err(e) => warn!(phone_number_id = id, error = %e, "phone number tenant lookup failed"),
            }
        }

        debug!(tenant_id = %self.default_tenant_id, "falling back to default tenant");
        (self.default_tenant_id.clone(), TenantSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use callcast_core::types::{AdapterType, Assistant, HealthStatus, PhoneNumber, Tenant};
    use callcast_core::{CallcastError, PluginAdapter};
    use callcast_test_utils::MemoryStore;
    use callcast_test_utils::fixtures::{self, PROVIDER_ASSISTANT_ID, PROVIDER_PHONE_NUMBER_ID, TENANT_ID};

    /// Directory whose every call errors.
    struct FailingDirectory;

    fn unavailable() -> CallcastError {
        CallcastError::Internal("directory unavailable".into())
    }

    #[async_trait]
    impl PluginAdapter for FailingDirectory {
        fn name(&self) -> &str {
            "failing-directory"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }

        fn adapter_type(&self) -> AdapterType {
            AdapterType::Storage
        }

        async fn health_check(&self) -> Result<HealthStatus, CallcastError> {
            Ok(HealthStatus::Unhealthy("directory unavailable".into()))
        }

        async fn shutdown(&self) -> Result<(), CallcastError> {
            Ok(())
        }
    }

    #[async_trait]
    impl TenantDirectory for FailingDirectory {
        async fn tenant_for_assistant(&self, _: &str) -> Result<Option<String>, CallcastError> {
            Err(unavailable())
        }

        async fn tenant_for_phone_number(&self, _: &str) -> Result<Option<String>, CallcastError> {
            Err(unavailable())
        }

        async fn get_tenant(&self, _: &str) -> Result<Option<Tenant>, CallcastError> {
            Err(unavailable())
        }

        async fn upsert_tenant(&self, _: &Tenant) -> Result<(), CallcastError> {
            Err(unavailable())
        }

        async fn upsert_assistant(&self, _: &Assistant) -> Result<(), CallcastError> {
            Err(unavailable())
        }

        async fn upsert_phone_number(&self, _: &PhoneNumber) -> Result<(), CallcastError> {
            Err(unavailable())
        }
    }

    async fn directory() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed_directory(store.as_ref()).await.unwrap();
        // A second tenant owns another phone number.
        store
            .upsert_phone_number(&PhoneNumber {
                id: "p2".into(),
                tenant_id: Some("globex".into()),
                provider_phone_number_id: "pn_globex".into(),
                ..fixtures::phone_number()
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn assistant_takes_precedence_over_phone_number() {
        let resolver = TenantResolver::new(directory().await, "default");
        let resolved = resolver
            .resolve_with_source(Some(PROVIDER_ASSISTANT_ID), Some("pn_globex"))
            .await;
        assert_eq!(resolved, (TENANT_ID.to_string(), TenantSource::Assistant));
    }

    #[tokio::test]
    async fn phone_number_used_when_assistant_unknown() {
        let resolver = TenantResolver::new(directory().await, "default");
        let resolved = resolver
            .resolve_with_source(Some("asst_unknown"), Some("pn_globex"))
            .await;
        assert_eq!(resolved, ("globex".to_string(), TenantSource::PhoneNumber));

        let resolved = resolver
            .resolve_with_source(None, Some(PROVIDER_PHONE_NUMBER_ID))
            .await;
        assert_eq!(resolved, (TENANT_ID.to_string(), TenantSource::PhoneNumber));
    }

    #[tokio::test]
    async fn unowned_assistant_falls_through() {
        let store = directory().await;
        store
            .upsert_assistant(&Assistant {
                id: "a2".into(),
                tenant_id: None,
                provider_assistant_id: "asst_orphan".into(),
                ..fixtures::assistant()
            })
            .await
            .unwrap();
        let resolver = TenantResolver::new(store, "default");
        assert_eq!(
            resolver.resolve(Some("asst_orphan"), Some("pn_globex")).await,
            "globex"
        );
    }

    #[tokio::test]
    async fn nothing_matches_yields_default() {
        let resolver = TenantResolver::new(directory().await, "default");
        assert_eq!(resolver.resolve(None, None).await, "default");
        assert_eq!(
            resolver.resolve(Some("asst_unknown"), Some("pn_unknown")).await,
            "default"
        );
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn lookup_errors_degrade_to_default() {
        let resolver = TenantResolver::new(Arc::new(FailingDirectory), "default");
        assert_eq!(
            resolver
                .resolve_with_source(Some(PROVIDER_ASSISTANT_ID), Some(PROVIDER_PHONE_NUMBER_ID))
                .await,
            ("default".to_string(), TenantSource::Default)
        );
        assert!(logs_contain("assistant tenant lookup failed"));
        assert!(logs_contain("phone number tenant lookup failed"));
    }
}
