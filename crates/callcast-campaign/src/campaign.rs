// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign creation from an accepted contact list.

use callcast_core::types::{Campaign, CampaignStatus, NewCampaign};
use callcast_core::{CallcastError, CampaignStore};
use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::contacts::ContactList;

/// Current time in the RFC 3339 form used for stored timestamps.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Persists a new `pending` campaign for `contacts`.
///
/// The assistant and phone number must already exist. When `new.tenant_id`
/// is unset the campaign belongs to the assistant's tenant. Jobs are not
/// created here; they are materialized when the campaign is started.
pub async fn create_campaign(
    store: &dyn CampaignStore,
    new: NewCampaign,
    contacts: &ContactList,
) -> Result<Campaign, CallcastError> {
    if contacts.is_empty() {
        return Err(CallcastError::Format(
            "contact list must have at least one data row".into(),
        ));
    }

    let assistant = store
        .get_assistant(&new.assistant_id)
        .await?
        .ok_or_else(|| CallcastError::not_found("assistant", &new.assistant_id))?;
    store
        .get_phone_number(&new.phone_number_id)
        .await?
        .ok_or_else(|| CallcastError::not_found("phone number", &new.phone_number_id))?;

    let now = now_timestamp();
    let campaign = Campaign {
        id: uuid::Uuid::new_v4().to_string(),
        tenant_id: new.tenant_id.or(assistant.tenant_id),
        name: new.name,
        assistant_id: new.assistant_id,
        phone_number_id: new.phone_number_id,
        csv_file_name: new.csv_file_name,
        total_numbers: contacts.len() as i64,
        completed_calls: 0,
        failed_calls: 0,
        status: CampaignStatus::Pending,
        created_at: now.clone(),
        updated_at: now,
    };
    store.create_campaign(&campaign).await?;

    info!(
        campaign_id = %campaign.id,
        total_numbers = campaign.total_numbers,
        "campaign created"
    );
    Ok(campaign)
}
