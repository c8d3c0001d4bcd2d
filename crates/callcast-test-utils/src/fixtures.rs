// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical seed data shared by dispatch, ingest, and gateway tests.
//!
//! Tenant `acme` owns assistant `a1` (provider id `asst_acme`) and phone
//! number `p1` (provider id `pn_acme`).

use callcast_core::types::{Assistant, Campaign, CampaignStatus, PhoneNumber, Tenant};
use callcast_core::{CallcastError, TenantDirectory};

pub const TENANT_ID: &str = "acme";
pub const ASSISTANT_ID: &str = "a1";
pub const PROVIDER_ASSISTANT_ID: &str = "asst_acme";
pub const PHONE_NUMBER_ID: &str = "p1";
pub const PROVIDER_PHONE_NUMBER_ID: &str = "pn_acme";
pub const TIMESTAMP: &str = "2026-01-01T00:00:00.000Z";

pub fn tenant() -> Tenant {
    Tenant {
        id: TENANT_ID.into(),
        name: "Acme".into(),
        email: "ops@acme.test".into(),
        is_active: true,
        created_at: TIMESTAMP.into(),
    }
}

pub fn assistant() -> Assistant {
    Assistant {
        id: ASSISTANT_ID.into(),
        tenant_id: Some(TENANT_ID.into()),
        provider_assistant_id: PROVIDER_ASSISTANT_ID.into(),
        name: "Riley".into(),
        is_active: true,
        created_at: TIMESTAMP.into(),
    }
}

pub fn phone_number() -> PhoneNumber {
    PhoneNumber {
        id: PHONE_NUMBER_ID.into(),
        tenant_id: Some(TENANT_ID.into()),
        provider_phone_number_id: PROVIDER_PHONE_NUMBER_ID.into(),
        number: "+15550100000".into(),
        name: "Acme main line".into(),
        is_active: true,
        created_at: TIMESTAMP.into(),
    }
}

/// A pending campaign using the seeded assistant and phone number.
pub fn campaign(id: &str, total_numbers: i64) -> Campaign {
    Campaign {
        id: id.into(),
        tenant_id: Some(TENANT_ID.into()),
        name: format!("campaign {id}"),
        assistant_id: ASSISTANT_ID.into(),
        phone_number_id: PHONE_NUMBER_ID.into(),
        csv_file_name: Some("contacts.csv".into()),
        total_numbers,
        completed_calls: 0,
        failed_calls: 0,
        status: CampaignStatus::Pending,
        created_at: TIMESTAMP.into(),
        updated_at: TIMESTAMP.into(),
    }
}

/// Writes the seeded tenant, assistant, and phone number.
pub async fn seed_directory(directory: &dyn TenantDirectory) -> Result<(), CallcastError> {
    directory.upsert_tenant(&tenant()).await?;
    directory.upsert_assistant(&assistant()).await?;
    directory.upsert_phone_number(&phone_number()).await
}
