// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the campaign, call record, and tenant stores.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use callcast_config::model::StorageConfig;
use callcast_core::types::{
    Assistant, CallFilter, CallRecord, Campaign, CampaignJob, CampaignProgress, PhoneNumber,
    Tenant,
};
use callcast_core::{
    AdapterType, CallRecordStore, CallcastError, CampaignStore, HealthStatus, PluginAdapter,
    TenantDirectory,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`SqliteStorage::initialize`]; every
/// store method fails with a storage error before that.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), CallcastError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CallcastError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, CallcastError> {
        self.db.get().ok_or_else(|| CallcastError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), CallcastError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CallcastError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CallcastError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl CampaignStore for SqliteStorage {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), CallcastError> {
        queries::campaigns::create_campaign(self.db()?, campaign).await
    }

    async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, CallcastError> {
        queries::campaigns::get_campaign(self.db()?, id).await
    }

    async fn list_campaigns(&self, tenant_id: Option<&str>) -> Result<Vec<Campaign>, CallcastError> {
        queries::campaigns::list_campaigns(self.db()?, tenant_id).await
    }

    async fn get_assistant(&self, id: &str) -> Result<Option<Assistant>, CallcastError> {
        queries::directory::get_assistant(self.db()?, id).await
    }

    async fn get_phone_number(&self, id: &str) -> Result<Option<PhoneNumber>, CallcastError> {
        queries::directory::get_phone_number(self.db()?, id).await
    }

    async fn update_campaign_progress(
        &self,
        id: &str,
        progress: CampaignProgress,
    ) -> Result<(), CallcastError> {
        queries::campaigns::update_campaign_progress(self.db()?, id, progress).await
    }

    async fn replace_jobs(
        &self,
        campaign_id: &str,
        jobs: &[CampaignJob],
    ) -> Result<(), CallcastError> {
        queries::jobs::replace_jobs(self.db()?, campaign_id, jobs).await
    }

    async fn mark_job_calling(
        &self,
        campaign_id: &str,
        phone_number: &str,
        call_id: &str,
    ) -> Result<(), CallcastError> {
        queries::jobs::mark_job_calling(self.db()?, campaign_id, phone_number, call_id).await
    }

    async fn mark_job_failed(
        &self,
        campaign_id: &str,
        phone_number: &str,
    ) -> Result<(), CallcastError> {
        queries::jobs::mark_job_failed(self.db()?, campaign_id, phone_number).await
    }

    async fn list_jobs(&self, campaign_id: &str) -> Result<Vec<CampaignJob>, CallcastError> {
        queries::jobs::list_jobs(self.db()?, campaign_id).await
    }
}

#[async_trait]
impl CallRecordStore for SqliteStorage {
    async fn insert_call_record(&self, record: &CallRecord) -> Result<(), CallcastError> {
        queries::call_records::insert_call_record(self.db()?, record).await
    }

    async fn list_call_records(
        &self,
        filter: &CallFilter,
    ) -> Result<Vec<CallRecord>, CallcastError> {
        queries::call_records::list_call_records(self.db()?, filter).await
    }

    async fn complete_job_for_call(&self, call_id: &str) -> Result<u64, CallcastError> {
        queries::jobs::complete_job_for_call(self.db()?, call_id).await
    }
}

#[async_trait]
impl TenantDirectory for SqliteStorage {
    async fn tenant_for_assistant(
        &self,
        provider_assistant_id: &str,
    ) -> Result<Option<String>, CallcastError> {
        queries::directory::tenant_for_assistant(self.db()?, provider_assistant_id).await
    }

    async fn tenant_for_phone_number(
        &self,
        provider_phone_number_id: &str,
    ) -> Result<Option<String>, CallcastError> {
        queries::directory::tenant_for_phone_number(self.db()?, provider_phone_number_id).await
    }

    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>, CallcastError> {
        queries::directory::get_tenant(self.db()?, id).await
    }

    async fn upsert_tenant(&self, tenant: &Tenant) -> Result<(), CallcastError> {
        queries::directory::upsert_tenant(self.db()?, tenant).await
    }

    async fn upsert_assistant(&self, assistant: &Assistant) -> Result<(), CallcastError> {
        queries::directory::upsert_assistant(self.db()?, assistant).await
    }

    async fn upsert_phone_number(&self, phone_number: &PhoneNumber) -> Result<(), CallcastError> {
        queries::directory::upsert_phone_number(self.db()?, phone_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_requires_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.shutdown().await.unwrap();
    }
}
