// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration of tenants and the provider resources they own.
//!
//! Assistants and phone numbers must be registered before a campaign can use
//! them, and their provider ids are what the webhook resolver maps back to a
//! tenant.

use callcast_core::types::{
    Assistant, NewAssistant, NewPhoneNumber, NewTenant, PhoneNumber, Tenant,
};
use callcast_core::{CallcastError, TenantDirectory};
use tracing::info;

use crate::campaign::now_timestamp;

/// Creates or overwrites a tenant.
///
/// An existing tenant keeps its original `created_at`.
pub async fn register_tenant(
    directory: &dyn TenantDirectory,
    new: NewTenant,
) -> Result<Tenant, CallcastError> {
    let id = record_id(new.id)?;
    let created_at = match directory.get_tenant(&id).await? {
        Some(existing) => existing.created_at,
        None => now_timestamp(),
    };
    let tenant = Tenant {
        id,
        name: new.name,
        email: new.email,
        is_active: new.is_active,
        created_at,
    };
    directory.upsert_tenant(&tenant).await?;
    info!(tenant_id = %tenant.id, "tenant registered");
    Ok(tenant)
}

/// Creates or overwrites an assistant owned by an existing tenant.
pub async fn register_assistant(
    directory: &dyn TenantDirectory,
    new: NewAssistant,
) -> Result<Assistant, CallcastError> {
    require_tenant(directory, &new.tenant_id).await?;
    let assistant = Assistant {
        id: record_id(new.id)?,
        tenant_id: Some(new.tenant_id),
        provider_assistant_id: required("provider_assistant_id", new.provider_assistant_id)?,
        name: new.name,
        is_active: new.is_active,
        created_at: now_timestamp(),
    };
    directory.upsert_assistant(&assistant).await?;
    info!(
        assistant_id = %assistant.id,
        provider_assistant_id = %assistant.provider_assistant_id,
        "assistant registered"
    );
    Ok(assistant)
}

/// Creates or overwrites a phone number owned by an existing tenant.
pub async fn register_phone_number(
    directory: &dyn TenantDirectory,
    new: NewPhoneNumber,
) -> Result<PhoneNumber, CallcastError> {
    require_tenant(directory, &new.tenant_id).await?;
    let phone_number = PhoneNumber {
        id: record_id(new.id)?,
        tenant_id: Some(new.tenant_id),
        provider_phone_number_id: required(
            "provider_phone_number_id",
            new.provider_phone_number_id,
        )?,
        number: required("number", new.number)?,
        name: new.name,
        is_active: new.is_active,
        created_at: now_timestamp(),
    };
    directory.upsert_phone_number(&phone_number).await?;
    info!(
        phone_number_id = %phone_number.id,
        provider_phone_number_id = %phone_number.provider_phone_number_id,
        "phone number registered"
    );
    Ok(phone_number)
}

async fn require_tenant(directory: &dyn TenantDirectory, id: &str) -> Result<(), CallcastError> {
    directory
        .get_tenant(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| CallcastError::not_found("tenant", id))
}

/// The caller's id, or a fresh one when absent.
fn record_id(id: Option<String>) -> Result<String, CallcastError> {
    match id {
        None => Ok(uuid::Uuid::new_v4().to_string()),
        Some(id) => required("id", id),
    }
}

fn required(field: &str, value: String) -> Result<String, CallcastError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CallcastError::Invalid(format!("`{field}` must not be blank")));
    }
    Ok(trimmed.to_string())
}
