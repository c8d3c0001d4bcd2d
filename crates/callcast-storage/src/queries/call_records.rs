// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call record inserts and filtered listing.

use callcast_core::CallcastError;
use callcast_core::types::CallFilter;
use rusqlite::params;
use rusqlite::types::Value as SqlValue;

use crate::database::Database;
use crate::models::{CallRecord, json_column, json_text, parse_column};

/// Append a call record. Never deduplicates on `call_id`.
pub async fn insert_call_record(db: &Database, record: &CallRecord) -> Result<(), CallcastError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO call_records (id, call_id, tenant_id, agent, from_number, to_number,
                    direction, ended_reason, duration_minutes, cost, sentiment, summary, transcript,
                    recording_url, structured_data, started_at, ended_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    record.id,
                    record.call_id,
                    record.tenant_id,
                    record.agent,
                    record.from_number,
                    record.to_number,
                    record.direction.to_string(),
                    record.ended_reason,
                    record.duration_minutes,
                    record.cost,
                    record.sentiment.to_string(),
                    record.summary,
                    record.transcript,
                    record.recording_url,
                    json_text(&record.structured_data),
                    record.started_at,
                    record.ended_at,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Build the WHERE clause and bind values for the scalar filter fields.
fn where_clause(filter: &CallFilter) -> (String, Vec<SqlValue>) {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    let mut push = |clause: &'static str, value: String| {
        clauses.push(clause);
        values.push(SqlValue::Text(value));
    };

    if let Some(tenant) = &filter.tenant_id {
        push("tenant_id = ?", tenant.clone());
    }
    if let Some(agent) = &filter.agent {
        push("agent = ?", agent.clone());
    }
    if let Some(direction) = filter.direction {
        push("direction = ?", direction.to_string());
    }
    if let Some(reason) = &filter.ended_reason {
        push("ended_reason = ?", reason.clone());
    }
    if let Some(sentiment) = filter.sentiment {
        push("sentiment = ?", sentiment.to_string());
    }
    if let Some(from) = &filter.from_number {
        push("instr(from_number, ?) > 0", from.clone());
    }
    if let Some(to) = &filter.to_number {
        push("instr(to_number, ?) > 0", to.clone());
    }
    if let Some(after) = &filter.started_after {
        push("started_at >= ?", after.clone());
    }
    if let Some(before) = &filter.started_before {
        push("started_at <= ?", before.clone());
    }
    if let Some(campaign) = &filter.campaign_id {
        push(
            "call_id IN (SELECT call_id FROM campaign_jobs WHERE campaign_id = ? AND call_id IS NOT NULL)",
            campaign.clone(),
        );
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

/// List call records matching `filter`, newest first.
///
/// Structured-data pairs are matched after the SQL query so values compare
/// as JSON rather than as SQLite affinities.
pub async fn list_call_records(
    db: &Database,
    filter: &CallFilter,
) -> Result<Vec<CallRecord>, CallcastError> {
    let (clause, values) = where_clause(filter);
    let sql = format!(
        "SELECT id, call_id, tenant_id, agent, from_number, to_number, direction, ended_reason,
                duration_minutes, cost, sentiment, summary, transcript, recording_url,
                structured_data, started_at, ended_at, created_at
         FROM call_records{clause}
         ORDER BY created_at DESC, rowid DESC"
    );

    let records = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(values), |row| {
                Ok(CallRecord {
                    id: row.get(0)?,
                    call_id: row.get(1)?,
                    tenant_id: row.get(2)?,
                    agent: row.get(3)?,
                    from_number: row.get(4)?,
                    to_number: row.get(5)?,
                    direction: parse_column(row, 6)?,
                    ended_reason: row.get(7)?,
                    duration_minutes: row.get(8)?,
                    cost: row.get(9)?,
                    sentiment: parse_column(row, 10)?,
                    summary: row.get(11)?,
                    transcript: row.get(12)?,
                    recording_url: row.get(13)?,
                    structured_data: json_column(row, 14)?,
                    started_at: row.get(15)?,
                    ended_at: row.get(16)?,
                    created_at: row.get(17)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    Ok(records
        .into_iter()
        .filter(|record| {
            filter
                .structured_data
                .iter()
                .all(|(key, expected)| record.structured_data.get(key) == Some(expected))
        })
        .collect())
}
