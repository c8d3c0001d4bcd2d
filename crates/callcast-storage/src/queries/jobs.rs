// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign job persistence, keyed by `(campaign_id, phone_number)`.

use callcast_core::CallcastError;
use callcast_core::types::JobStatus;
use rusqlite::params;

use crate::database::Database;
use crate::models::{CampaignJob, json_column, json_text, parse_column};

/// Replace a campaign's job set in one transaction. An existing
/// `(campaign_id, phone_number)` row is reset to the incoming state and rows
/// missing from `jobs` are deleted.
pub async fn replace_jobs(
    db: &Database,
    campaign_id: &str,
    jobs: &[CampaignJob],
) -> Result<(), CallcastError> {
    let campaign_id = campaign_id.to_string();
    let jobs = jobs.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let kept: Vec<&str> = jobs
                    .iter()
                    .filter(|job| job.campaign_id == campaign_id)
                    .map(|job| job.phone_number.as_str())
                    .collect();
                let mut existing = tx.prepare(
                    "SELECT phone_number FROM campaign_jobs WHERE campaign_id = ?1",
                )?;
                let stale: Vec<String> = existing
                    .query_map(params![campaign_id], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?
                    .into_iter()
                    .filter(|phone| !kept.contains(&phone.as_str()))
                    .collect();
                let mut delete = tx.prepare(
                    "DELETE FROM campaign_jobs WHERE campaign_id = ?1 AND phone_number = ?2",
                )?;
                for phone in &stale {
                    delete.execute(params![campaign_id, phone])?;
                }

                let mut stmt = tx.prepare(
                    "INSERT INTO campaign_jobs
                        (campaign_id, phone_number, variables, status, call_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(campaign_id, phone_number) DO UPDATE SET
                        variables = excluded.variables,
                        status = excluded.status,
                        call_id = excluded.call_id,
                        updated_at = excluded.updated_at",
                )?;
                for job in &jobs {
                    stmt.execute(params![
                        job.campaign_id,
                        job.phone_number,
                        json_text(&job.variables),
                        job.status.to_string(),
                        job.call_id,
                        job.created_at,
                        job.updated_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

async fn set_job_state(
    db: &Database,
    campaign_id: &str,
    phone_number: &str,
    status: JobStatus,
    call_id: Option<&str>,
) -> Result<(), CallcastError> {
    let campaign = campaign_id.to_string();
    let phone = phone_number.to_string();
    let call_id = call_id.map(str::to_string);
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE campaign_jobs
                 SET status = ?1, call_id = COALESCE(?2, call_id),
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE campaign_id = ?3 AND phone_number = ?4",
                params![status.to_string(), call_id, campaign, phone],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if updated == 0 {
        return Err(CallcastError::not_found(
            "campaign job",
            format!("{campaign_id}/{phone_number}"),
        ));
    }
    Ok(())
}

/// Record the provider call id and move the job to `calling`.
pub async fn mark_job_calling(
    db: &Database,
    campaign_id: &str,
    phone_number: &str,
    call_id: &str,
) -> Result<(), CallcastError> {
    set_job_state(db, campaign_id, phone_number, JobStatus::Calling, Some(call_id)).await
}

/// Move the job to `failed`.
pub async fn mark_job_failed(
    db: &Database,
    campaign_id: &str,
    phone_number: &str,
) -> Result<(), CallcastError> {
    set_job_state(db, campaign_id, phone_number, JobStatus::Failed, None).await
}

/// Jobs of a campaign in insertion order.
pub async fn list_jobs(db: &Database, campaign_id: &str) -> Result<Vec<CampaignJob>, CallcastError> {
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT campaign_id, phone_number, variables, status, call_id, created_at, updated_at
                 FROM campaign_jobs WHERE campaign_id = ?1 ORDER BY rowid",
            )?;
            let rows = stmt.query_map(params![campaign_id], |row| {
                Ok(CampaignJob {
                    campaign_id: row.get(0)?,
                    phone_number: row.get(1)?,
                    variables: json_column(row, 2)?,
                    status: parse_column(row, 3)?,
                    call_id: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Move the job that placed `call_id` from `calling` to `completed`.
pub async fn complete_job_for_call(db: &Database, call_id: &str) -> Result<u64, CallcastError> {
    let call_id = call_id.to_string();
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE campaign_jobs
                 SET status = 'completed', updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE call_id = ?1 AND status = 'calling'",
                params![call_id],
            )
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    Ok(updated as u64)
}
