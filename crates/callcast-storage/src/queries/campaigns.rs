// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign aggregate CRUD.

use callcast_core::CallcastError;
use rusqlite::{OptionalExtension, Row, params};

use crate::database::Database;
use crate::models::{Campaign, CampaignProgress, parse_column};

const CAMPAIGN_COLUMNS: &str = "id, tenant_id, name, assistant_id, phone_number_id, csv_file_name,
    total_numbers, completed_calls, failed_calls, status, created_at, updated_at";

fn campaign_from_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        tenant_id: row.get(1)?,
        name: row.get(2)?,
        assistant_id: row.get(3)?,
        phone_number_id: row.get(4)?,
        csv_file_name: row.get(5)?,
        total_numbers: row.get(6)?,
        completed_calls: row.get(7)?,
        failed_calls: row.get(8)?,
        status: parse_column(row, 9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Insert a new campaign.
pub async fn create_campaign(db: &Database, campaign: &Campaign) -> Result<(), CallcastError> {
    let campaign = campaign.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaigns (id, tenant_id, name, assistant_id, phone_number_id,
                    csv_file_name, total_numbers, completed_calls, failed_calls, status,
                    created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    campaign.id,
                    campaign.tenant_id,
                    campaign.name,
                    campaign.assistant_id,
                    campaign.phone_number_id,
                    campaign.csv_file_name,
                    campaign.total_numbers,
                    campaign.completed_calls,
                    campaign.failed_calls,
                    campaign.status.to_string(),
                    campaign.created_at,
                    campaign.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a campaign by id.
pub async fn get_campaign(db: &Database, id: &str) -> Result<Option<Campaign>, CallcastError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = ?1"),
                params![id],
                campaign_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List campaigns newest first, optionally for one tenant only.
pub async fn list_campaigns(
    db: &Database,
    tenant_id: Option<&str>,
) -> Result<Vec<Campaign>, CallcastError> {
    let tenant_id = tenant_id.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CAMPAIGN_COLUMNS} FROM campaigns
                 WHERE ?1 IS NULL OR tenant_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let campaigns = stmt
                .query_map(params![tenant_id], campaign_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(campaigns)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite a campaign's counters and status.
///
/// Fails with `NotFound` when no campaign has this id.
pub async fn update_campaign_progress(
    db: &Database,
    id: &str,
    progress: CampaignProgress,
) -> Result<(), CallcastError> {
    let campaign_id = id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE campaigns SET total_numbers = ?1, completed_calls = ?2, failed_calls = ?3,
                    status = ?4, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?5",
                params![
                    progress.total_numbers,
                    progress.completed_calls,
                    progress.failed_calls,
                    progress.status.to_string(),
                    campaign_id,
                ],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if updated == 0 {
        return Err(CallcastError::not_found("campaign", id));
    }
    Ok(())
}
