// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the campaign, call record, and tenant stores.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use callcast_core::types::{
    AdapterType, Assistant, CallFilter, CallRecord, Campaign, CampaignJob, CampaignProgress,
    HealthStatus, JobStatus, PhoneNumber, Tenant,
};
use callcast_core::{
    CallRecordStore, CallcastError, CampaignStore, PluginAdapter, TenantDirectory,
};

#[derive(Default)]
struct Inner {
    tenants: HashMap<String, Tenant>,
    assistants: HashMap<String, Assistant>,
    phone_numbers: HashMap<String, PhoneNumber>,
    campaigns: HashMap<String, Campaign>,
    jobs: Vec<CampaignJob>,
    records: Vec<CallRecord>,
    progress_log: Vec<(String, CampaignProgress)>,
}

/// Store that keeps everything in process memory.
///
/// Every progress write is also appended to a log so tests can check how
/// counters evolved during a run.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All progress writes for `campaign_id`, oldest first.
    pub async fn progress_log(&self, campaign_id: &str) -> Vec<CampaignProgress> {
        self.inner
            .lock()
            .await
            .progress_log
            .iter()
            .filter(|(id, _)| id == campaign_id)
            .map(|(_, progress)| *progress)
            .collect()
    }

    /// Every stored call record in insertion order.
    pub async fn records(&self) -> Vec<CallRecord> {
        self.inner.lock().await.records.clone()
    }
}

fn matches(filter: &CallFilter, record: &CallRecord, jobs: &[CampaignJob]) -> bool {
    let eq = |want: &Option<String>, have: &str| want.as_deref().is_none_or(|w| w == have);
    let contains = |want: &Option<String>, have: &str| {
        want.as_deref().is_none_or(|w| have.contains(w))
    };
    let started = record.started_at.as_deref();

    eq(&filter.tenant_id, &record.tenant_id)
        && eq(&filter.agent, &record.agent)
        && filter.direction.is_none_or(|d| d == record.direction)
        && eq(&filter.ended_reason, &record.ended_reason)
        && filter.sentiment.is_none_or(|s| s == record.sentiment)
        && contains(&filter.from_number, &record.from_number)
        && contains(&filter.to_number, &record.to_number)
        && filter
            .started_after
            .as_deref()
            .is_none_or(|after| started.is_some_and(|s| s >= after))
        && filter
            .started_before
            .as_deref()
            .is_none_or(|before| started.is_some_and(|s| s <= before))
        && filter.campaign_id.as_deref().is_none_or(|campaign| {
            jobs.iter().any(|job| {
                job.campaign_id == campaign && job.call_id.as_deref() == Some(record.call_id.as_str())
            })
        })
        && filter
            .structured_data
            .iter()
            .all(|(key, value)| record.structured_data.get(key) == Some(value))
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, CallcastError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CallcastError> {
        Ok(())
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn create_campaign(&self, campaign: &Campaign) -> Result<(), CallcastError> {
        let mut inner = self.inner.lock().await;
        if inner.campaigns.contains_key(&campaign.id) {
            return Err(CallcastError::Storage {
                source: format!("campaign {} already exists", campaign.id).into(),
            });
        }
        inner.campaigns.insert(campaign.id.clone(), campaign.clone());
        Ok(())
    }

    async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, CallcastError> {
        Ok(self.inner.lock().await.campaigns.get(id).cloned())
    }

    async fn list_campaigns(&self, tenant_id: Option<&str>) -> Result<Vec<Campaign>, CallcastError> {
        let inner = self.inner.lock().await;
        let mut campaigns: Vec<Campaign> = inner
            .campaigns
            .values()
            .filter(|c| tenant_id.is_none() || c.tenant_id.as_deref() == tenant_id)
            .cloned()
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(campaigns)
    }

    async fn get_assistant(&self, id: &str) -> Result<Option<Assistant>, CallcastError> {
        Ok(self.inner.lock().await.assistants.get(id).cloned())
    }

    async fn get_phone_number(&self, id: &str) -> Result<Option<PhoneNumber>, CallcastError> {
        Ok(self.inner.lock().await.phone_numbers.get(id).cloned())
    }

    async fn update_campaign_progress(
        &self,
        id: &str,
        progress: CampaignProgress,
    ) -> Result<(), CallcastError> {
        let mut inner = self.inner.lock().await;
        let campaign = inner
            .campaigns
            .get_mut(id)
            .ok_or_else(|| CallcastError::not_found("campaign", id))?;
        campaign.total_numbers = progress.total_numbers;
        campaign.completed_calls = progress.completed_calls;
        campaign.failed_calls = progress.failed_calls;
        campaign.status = progress.status;
        inner.progress_log.push((id.to_string(), progress));
        Ok(())
    }

    async fn replace_jobs(
        &self,
        campaign_id: &str,
        jobs: &[CampaignJob],
    ) -> Result<(), CallcastError> {
        let mut inner = self.inner.lock().await;
        inner.jobs.retain(|existing| {
            existing.campaign_id != campaign_id
                || jobs.iter().any(|job| {
                    job.campaign_id == existing.campaign_id
                        && job.phone_number == existing.phone_number
                })
        });
        for job in jobs {
            match inner.jobs.iter().position(|existing| {
                existing.campaign_id == job.campaign_id && existing.phone_number == job.phone_number
            }) {
                Some(i) => inner.jobs[i] = job.clone(),
                None => inner.jobs.push(job.clone()),
            }
        }
        Ok(())
    }

    async fn mark_job_calling(
        &self,
        campaign_id: &str,
        phone_number: &str,
        call_id: &str,
    ) -> Result<(), CallcastError> {
        let mut inner = self.inner.lock().await;
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.campaign_id == campaign_id && j.phone_number == phone_number)
            .ok_or_else(|| {
                CallcastError::not_found("campaign job", format!("{campaign_id}/{phone_number}"))
            })?;
        job.status = JobStatus::Calling;
        job.call_id = Some(call_id.to_string());
        Ok(())
    }

    async fn mark_job_failed(
        &self,
        campaign_id: &str,
        phone_number: &str,
    ) -> Result<(), CallcastError> {
        let mut inner = self.inner.lock().await;
        let job = inner
            .jobs
            .iter_mut()
            .find(|j| j.campaign_id == campaign_id && j.phone_number == phone_number)
            .ok_or_else(|| {
                CallcastError::not_found("campaign job", format!("{campaign_id}/{phone_number}"))
            })?;
        job.status = JobStatus::Failed;
        Ok(())
    }

    async fn list_jobs(&self, campaign_id: &str) -> Result<Vec<CampaignJob>, CallcastError> {
        Ok(self
            .inner
            .lock()
            .await
            .jobs
            .iter()
            .filter(|j| j.campaign_id == campaign_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CallRecordStore for MemoryStore {
    async fn insert_call_record(&self, record: &CallRecord) -> Result<(), CallcastError> {
        self.inner.lock().await.records.push(record.clone());
        Ok(())
    }

    async fn list_call_records(
        &self,
        filter: &CallFilter,
    ) -> Result<Vec<CallRecord>, CallcastError> {
        let inner = self.inner.lock().await;
        let mut found: Vec<CallRecord> = inner
            .records
            .iter()
            .rev()
            .filter(|r| matches(filter, r, &inner.jobs))
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn complete_job_for_call(&self, call_id: &str) -> Result<u64, CallcastError> {
        let mut inner = self.inner.lock().await;
        let mut updated = 0;
        for job in inner
            .jobs
            .iter_mut()
            .filter(|j| j.call_id.as_deref() == Some(call_id) && j.status == JobStatus::Calling)
        {
            job.status = JobStatus::Completed;
            updated += 1;
        }
        Ok(updated)
    }
}

#[async_trait]
impl TenantDirectory for MemoryStore {
    async fn tenant_for_assistant(
        &self,
        provider_assistant_id: &str,
    ) -> Result<Option<String>, CallcastError> {
        Ok(self
            .inner
            .lock()
            .await
            .assistants
            .values()
            .find(|a| a.provider_assistant_id == provider_assistant_id)
            .and_then(|a| a.tenant_id.clone()))
    }

    async fn tenant_for_phone_number(
        &self,
        provider_phone_number_id: &str,
    ) -> Result<Option<String>, CallcastError> {
        Ok(self
            .inner
            .lock()
            .await
            .phone_numbers
            .values()
            .find(|p| p.provider_phone_number_id == provider_phone_number_id)
            .and_then(|p| p.tenant_id.clone()))
    }

    async fn get_tenant(&self, id: &str) -> Result<Option<Tenant>, CallcastError> {
        Ok(self.inner.lock().await.tenants.get(id).cloned())
    }

    async fn upsert_tenant(&self, tenant: &Tenant) -> Result<(), CallcastError> {
        self.inner
            .lock()
            .await
            .tenants
            .insert(tenant.id.clone(), tenant.clone());
        Ok(())
    }

    async fn upsert_assistant(&self, assistant: &Assistant) -> Result<(), CallcastError> {
        self.inner
            .lock()
            .await
            .assistants
            .insert(assistant.id.clone(), assistant.clone());
        Ok(())
    }

    async fn upsert_phone_number(&self, phone_number: &PhoneNumber) -> Result<(), CallcastError> {
        self.inner
            .lock()
            .await
            .phone_numbers
            .insert(phone_number.id.clone(), phone_number.clone());
        Ok(())
    }
}
