// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenants, assistants, and phone numbers.

use callcast_core::CallcastError;
use rusqlite::{OptionalExtension, Row, params};

use crate::database::Database;
use crate::models::{Assistant, PhoneNumber, Tenant};

const ASSISTANT_COLUMNS: &str =
    "id, tenant_id, provider_assistant_id, name, is_active, created_at";
const PHONE_NUMBER_COLUMNS: &str =
    "id, tenant_id, provider_phone_number_id, number, name, is_active, created_at";

fn assistant_from_row(row: &Row<'_>) -> rusqlite::Result<Assistant> {
    Ok(Assistant {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        provider_assistant_id: row.get(2)?,
        name: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn phone_number_from_row(row: &Row<'_>) -> rusqlite::Result<PhoneNumber> {
    Ok(PhoneNumber {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        provider_phone_number_id: row.get(2)?,
        number: row.get(3)?,
        name: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a tenant or overwrite the existing row with the same id.
pub async fn upsert_tenant(db: &Database, tenant: &Tenant) -> Result<(), CallcastError> {
    let tenant = tenant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO tenants (id, name, email, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email,
                    is_active = excluded.is_active",
                params![
                    tenant.id,
                    tenant.name,
                    tenant.email,
                    tenant.is_active,
                    tenant.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a tenant by id.
pub async fn get_tenant(db: &Database, id: &str) -> Result<Option<Tenant>, CallcastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, name, email, is_active, created_at FROM tenants WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Tenant {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        is_active: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert an assistant or overwrite the existing row with the same id.
pub async fn upsert_assistant(db: &Database, assistant: &Assistant) -> Result<(), CallcastError> {
    let assistant = assistant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO assistants (id, tenant_id, provider_assistant_id, name, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    tenant_id = excluded.tenant_id,
                    provider_assistant_id = excluded.provider_assistant_id,
                    name = excluded.name,
                    is_active = excluded.is_active",
                params![
                    assistant.id,
                    assistant.tenant_id,
                    assistant.provider_assistant_id,
                    assistant.name,
                    assistant.is_active,
                    assistant.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an assistant by its local id.
pub async fn get_assistant(db: &Database, id: &str) -> Result<Option<Assistant>, CallcastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {ASSISTANT_COLUMNS} FROM assistants WHERE id = ?1"),
                params![id],
                assistant_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a phone number or overwrite the existing row with the same id.
pub async fn upsert_phone_number(
    db: &Database,
    phone_number: &PhoneNumber,
) -> Result<(), CallcastError> {
    let phone = phone_number.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO phone_numbers
                    (id, tenant_id, provider_phone_number_id, number, name, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    tenant_id = excluded.tenant_id,
                    provider_phone_number_id = excluded.provider_phone_number_id,
                    number = excluded.number,
                    name = excluded.name,
                    is_active = excluded.is_active",
                params![
                    phone.id,
                    phone.tenant_id,
                    phone.provider_phone_number_id,
                    phone.number,
                    phone.name,
                    phone.is_active,
                    phone.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a phone number by its local id.
pub async fn get_phone_number(
    db: &Database,
    id: &str,
) -> Result<Option<PhoneNumber>, CallcastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {PHONE_NUMBER_COLUMNS} FROM phone_numbers WHERE id = ?1"),
                params![id],
                phone_number_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Tenant owning the assistant with this provider-issued id.
pub async fn tenant_for_assistant(
    db: &Database,
    provider_assistant_id: &str,
) -> Result<Option<String>, CallcastError> {
    let key = provider_assistant_id.to_string();
    db.connection()
        .call(move |conn| {
            let owner: Option<Option<String>> = conn
                .query_row(
                    "SELECT tenant_id FROM assistants WHERE provider_assistant_id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(owner.flatten())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Tenant owning the phone number with this provider-issued id.
pub async fn tenant_for_phone_number(
    db: &Database,
    provider_phone_number_id: &str,
) -> Result<Option<String>, CallcastError> {
    let key = provider_phone_number_id.to_string();
    db.connection()
        .call(move |conn| {
            let owner: Option<Option<String>> = conn
                .query_row(
                    "SELECT tenant_id FROM phone_numbers WHERE provider_phone_number_id = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(owner.flatten())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
