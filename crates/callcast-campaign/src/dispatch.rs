// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batched outbound call dispatch.
//!
//! A run places one call per contact in fixed-size batches. All calls in a
//! batch are issued together and the run waits for every one of them to
//! settle before pausing and starting the next batch, so no more than
//! `batch_size` requests are ever in flight.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use callcast_config::model::DispatchConfig;
use callcast_core::types::{
    CallRequest, CampaignJob, CampaignProgress, CampaignStatus, DispatchSummary, JobStatus,
};
use callcast_core::{CallProvider, CallcastError, CampaignStore};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::campaign::now_timestamp;
use crate::contacts::ContactRow;

/// Batch pacing for a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_secs(1),
        }
    }
}

impl From<&DispatchConfig> for DispatchSettings {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }
}

/// Provider identifiers every call in a run is placed with.
struct CallOrigin {
    assistant_id: String,
    phone_number_id: String,
}

/// Runs campaigns against a calling provider.
pub struct Dispatcher {
    store: Arc<dyn CampaignStore>,
    provider: Arc<dyn CallProvider>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        provider: Arc<dyn CallProvider>,
        settings: DispatchSettings,
    ) -> Self {
        let settings = DispatchSettings {
            batch_size: settings.batch_size.max(1),
            ..settings
        };
        Self {
            store,
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Places one call per contact and returns the success/failure tally.
    ///
    /// The campaign, its assistant, and its phone number must exist;
    /// otherwise nothing is written and no call is placed. Provider failures
    /// are counted per job and never abort the run. The campaign ends
    /// `running` when at least one call was accepted and `failed` otherwise.
    pub async fn start_campaign(
        &self,
        campaign_id: &str,
        contacts: &[ContactRow],
    ) -> Result<DispatchSummary, CallcastError> {
        let campaign = self
            .store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| CallcastError::not_found("campaign", campaign_id))?;
        let assistant = self
            .store
            .get_assistant(&campaign.assistant_id)
            .await?
            .ok_or_else(|| CallcastError::not_found("assistant", &campaign.assistant_id))?;
        let phone_number = self
            .store
            .get_phone_number(&campaign.phone_number_id)
            .await?
            .ok_or_else(|| CallcastError::not_found("phone number", &campaign.phone_number_id))?;

        let origin = CallOrigin {
            assistant_id: assistant.provider_assistant_id,
            phone_number_id: phone_number.provider_phone_number_id,
        };
        let jobs = materialize_jobs(campaign_id, contacts);
        let total_numbers = jobs.len() as i64;

        self.store
            .update_campaign_progress(
                campaign_id,
                CampaignProgress {
                    total_numbers,
                    completed_calls: 0,
                    failed_calls: 0,
                    status: CampaignStatus::Running,
                },
            )
            .await?;
        self.store.replace_jobs(campaign_id, &jobs).await?;

        info!(
            campaign_id,
            jobs = jobs.len(),
            batch_size = self.settings.batch_size,
            "campaign dispatch started"
        );

        let mut summary = DispatchSummary::default();
        for (index, batch) in jobs.chunks(self.settings.batch_size).enumerate() {
            if index > 0 && !self.settings.batch_delay.is_zero() {
                tokio::time::sleep(self.settings.batch_delay).await;
            }
            debug!(campaign_id, batch = index, size = batch.len(), "dispatching batch");

            let outcomes = join_all(batch.iter().map(|job| self.dispatch_job(job, &origin))).await;
            for accepted in outcomes {
                if accepted {
                    summary.success_count += 1;
                } else {
                    summary.fail_count += 1;
                }
            }

            let progress = progress(total_numbers, summary, CampaignStatus::Running);
            if let Err(e) = self.store.update_campaign_progress(campaign_id, progress).await {
                warn!(campaign_id, error = %e, "failed to persist batch progress");
            }
        }

        let status = if summary.success_count > 0 {
            CampaignStatus::Running
        } else {
            CampaignStatus::Failed
        };
        self.store
            .update_campaign_progress(campaign_id, progress(total_numbers, summary, status))
            .await?;

        info!(
            campaign_id,
            success_count = summary.success_count,
            fail_count = summary.fail_count,
            status = %status,
            "campaign dispatch finished"
        );
        Ok(summary)
    }

    /// Places a single call. Returns whether the provider accepted it.
    async fn dispatch_job(&self, job: &CampaignJob, origin: &CallOrigin) -> bool {
        let request = CallRequest {
            assistant_id: origin.assistant_id.clone(),
            phone_number_id: origin.phone_number_id.clone(),
            customer_number: job.phone_number.clone(),
            variables: job.variables.clone(),
        };

        match self.provider.create_call(&request).await {
            Ok(placed) => {
                debug!(
                    campaign_id = %job.campaign_id,
                    phone_number = %job.phone_number,
                    call_id = %placed.call_id,
                    "call placed"
                );
                if let Err(e) = self
                    .store
                    .mark_job_calling(&job.campaign_id, &job.phone_number, &placed.call_id)
                    .await
                {
                    warn!(
                        campaign_id = %job.campaign_id,
                        call_id = %placed.call_id,
                        error = %e,
                        "call placed but job state not saved"
                    );
                }
                true
            }
            Err(e) => {
                warn!(
                    campaign_id = %job.campaign_id,
                    phone_number = %job.phone_number,
                    error = %e,
                    "call dispatch failed"
                );
                if let Err(e) = self
                    .store
                    .mark_job_failed(&job.campaign_id, &job.phone_number)
                    .await
                {
                    warn!(campaign_id = %job.campaign_id, error = %e, "failed to mark job failed");
                }
                false
            }
        }
    }
}

fn progress(total_numbers: i64, summary: DispatchSummary, status: CampaignStatus) -> CampaignProgress {
    CampaignProgress {
        total_numbers,
        completed_calls: summary.success_count as i64,
        failed_calls: summary.fail_count as i64,
        status,
    }
}

/// One pending job per contact with a usable phone number, in input order.
///
/// Rows without a phone value are dropped; a number already seen keeps its
/// first row.
fn materialize_jobs(campaign_id: &str, contacts: &[ContactRow]) -> Vec<CampaignJob> {
    let now = now_timestamp();
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(contacts.len());

    for (row, contact) in contacts.iter().enumerate() {
        let Some(phone_number) = contact.phone_number() else {
            debug!(campaign_id, row, "contact without phone number skipped");
            continue;
        };
        if !seen.insert(phone_number.to_string()) {
            warn!(campaign_id, row, phone_number, "duplicate phone number skipped");
            continue;
        }
        jobs.push(CampaignJob {
            campaign_id: campaign_id.to_string(),
            phone_number: phone_number.to_string(),
            variables: contact.variables(),
            status: JobStatus::Pending,
            call_id: None,
            created_at: now.clone(),
            updated_at: now.clone(),
        });
    }
    jobs
}
