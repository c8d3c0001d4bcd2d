// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for campaigns, call records, and the tenant directory.
//!
//! The SQLite backend implements all three on one struct; tests use an
//! in-memory implementation.

use async_trait::async_trait;

use crate::error::CallcastError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Assistant, CallFilter, CallRecord, Campaign, CampaignJob, CampaignProgress, PhoneNumber,
    Tenant,
};

/// Campaign aggregate and per-contact job persistence.
#[async_trait]
pub trait CampaignStore: PluginAdapter {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), CallcastError>;

    async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, CallcastError>;

    /// Campaigns newest first, optionally restricted to one tenant.
    async fn list_campaigns(&self, tenant_id: Option<&str>) -> Result<Vec<Campaign>, CallcastError>;

    /// Looks up an assistant by its local record id.
    async fn get_assistant(&self, id: &str) -> Result<Option<Assistant>, CallcastError>;

    /// Looks up a phone number by its local record id.
    async fn get_phone_number(&self, id: &str) -> Result<Option<PhoneNumber>, CallcastError>;

    /// Overwrites the campaign's counters and status.
    async fn update_campaign_progress(
        &self,
        id: &str,
        progress: CampaignProgress,
    ) -> Result<(), CallcastError>;

    /// Makes `jobs` the campaign's job set. A job whose
    /// `(campaign_id, phone_number)` already exists is reset to the new row;
    /// jobs of this campaign absent from `jobs` are removed.
    async fn replace_jobs(
        &self,
        campaign_id: &str,
        jobs: &[CampaignJob],
    ) -> Result<(), CallcastError>;

    /// Records the provider call id and moves the job to `calling`.
    async fn mark_job_calling(
        &self,
        campaign_id: &str,
        phone_number: &str,
        call_id: &str,
    ) -> Result<(), CallcastError>;

    /// Moves the job to `failed`.
    async fn mark_job_failed(
        &self,
        campaign_id: &str,
        phone_number: &str,
    ) -> Result<(), CallcastError>;

    async fn list_jobs(&self, campaign_id: &str) -> Result<Vec<CampaignJob>, CallcastError>;
}

/// Append-only call record persistence.
#[async_trait]
pub trait CallRecordStore: PluginAdapter {
    /// Appends a record. Never deduplicates on the provider call id.
    async fn insert_call_record(&self, record: &CallRecord) -> Result<(), CallcastError>;

    /// Returns matching records, newest first.
    async fn list_call_records(&self, filter: &CallFilter)
    -> Result<Vec<CallRecord>, CallcastError>;

    /// Moves the job that placed `call_id` from `calling` to `completed`.
    ///
    /// Returns the number of jobs updated (0 when the call was not placed by
    /// a campaign).
    async fn complete_job_for_call(&self, call_id: &str) -> Result<u64, CallcastError>;
}

/// Tenants and the provider resources they own.
#[async_trait]
pub trait TenantDirectory: PluginAdapter {
    /// Tenant owning the assistant with this provider-issued id.
    async fn tenant_for_assistant(
        &self,
        provider_assistant_id: &str,
    ) -> Result<Option<String>, CallcastError>;

    /// Tenant owning the phone number with this provider-issued id.
    async fn tenant_for_phone_number(
        &self,
        provider_phone_number_id: &str,
    ) -> Result<Option<String>, CallcastError>;

    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>, CallcastError>;

    async fn upsert_tenant(&self, tenant: &Tenant) -> Result<(), CallcastError>;

    async fn upsert_assistant(&self, assistant: &Assistant) -> Result<(), CallcastError>;

    async fn upsert_phone_number(&self, phone_number: &PhoneNumber) -> Result<(), CallcastError>;
}
