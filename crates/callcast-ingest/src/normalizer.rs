// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-of-call report normalization.

use std::sync::Arc;

use callcast_config::model::IngestConfig;
use callcast_core::types::{CallDirection, CallRecord, Sentiment};
use callcast_core::{CallRecordStore, CallcastError};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::derive;
use crate::fields::{self, Field};
use crate::tenant::TenantResolver;

/// `message.type` of the only event this module accepts.
pub const END_OF_CALL_REPORT: &str = "end-of-call-report";

const UNKNOWN_AGENT: &str = "Unknown Agent";
const UNKNOWN_ENDED_REASON: &str = "unknown";

/// Canonical fields of one end-of-call report, before tenant attribution.
///
/// Missing fields degrade to empty strings, zero, or neutral sentiment.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    pub call_id: String,
    pub agent: String,
    pub from_number: String,
    pub to_number: String,
    pub direction: CallDirection,
    pub ended_reason: String,
    pub duration_minutes: f64,
    pub cost: f64,
    pub sentiment: Sentiment,
    pub summary: String,
    pub transcript: String,
    pub recording_url: String,
    pub structured_data: Map<String, Value>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    /// Provider-issued assistant id, used for tenant attribution.
    pub assistant_id: Option<String>,
    /// Provider-issued phone number id, used for tenant attribution.
    pub phone_number_id: Option<String>,
}

impl CallEvent {
    /// Extracts the canonical fields from a raw webhook body.
    ///
    /// Fails with [`CallcastError::UnsupportedEvent`] unless
    /// `message.type` is `end-of-call-report`.
    pub fn from_payload(payload: &Value, cost_per_second: f64) -> Result<Self, CallcastError> {
        let message = payload
            .get("message")
            .filter(|m| m.is_object())
            .ok_or(CallcastError::UnsupportedEvent { event_type: None })?;
        match message.get("type").and_then(Value::as_str) {
            Some(END_OF_CALL_REPORT) => {}
            other => {
                return Err(CallcastError::UnsupportedEvent {
                    event_type: other.map(str::to_string),
                });
            }
        }

        let text = |field| fields::text(message, field).unwrap_or_default().to_string();
        let optional = |field| fields::text(message, field).map(str::to_string);
        let timestamp = |field| {
            optional(field).map(|raw| {
                derive::utc_timestamp(&raw).unwrap_or_else(|| {
                    debug!(timestamp = %raw, "keeping unparseable timestamp as sent");
                    raw
                })
            })
        };

        let call_types = Field::CallType
            .paths()
            .iter()
            .filter_map(|path| fields::lookup(message, path).and_then(Value::as_str));
        let duration_minutes = fields::number(message, Field::DurationMinutes).unwrap_or(0.0);
        let cost = derive::cost(
            fields::number(message, Field::Cost),
            duration_minutes,
            cost_per_second,
        );

        Ok(Self {
            call_id: text(Field::CallId),
            agent: optional(Field::Agent).unwrap_or_else(|| UNKNOWN_AGENT.to_string()),
            from_number: text(Field::FromNumber),
            to_number: text(Field::ToNumber),
            direction: derive::direction(call_types),
            ended_reason: optional(Field::EndedReason)
                .unwrap_or_else(|| UNKNOWN_ENDED_REASON.to_string()),
            duration_minutes,
            cost,
            sentiment: derive::sentiment(fields::raw(message, Field::SuccessEvaluation)),
            summary: text(Field::Summary),
            transcript: text(Field::Transcript),
            recording_url: text(Field::RecordingUrl),
            structured_data: fields::object(message, Field::StructuredData)
                .cloned()
                .unwrap_or_default(),
            started_at: timestamp(Field::StartedAt),
            ended_at: timestamp(Field::EndedAt),
            assistant_id: optional(Field::AssistantId),
            phone_number_id: optional(Field::PhoneNumberId),
        })
    }

    /// Builds the stored record for this event under `tenant_id`.
    pub fn into_record(self, tenant_id: String) -> CallRecord {
        CallRecord {
            id: uuid::Uuid::new_v4().to_string(),
            call_id: self.call_id,
            tenant_id,
            agent: self.agent,
            from_number: self.from_number,
            to_number: self.to_number,
            direction: self.direction,
            ended_reason: self.ended_reason,
            duration_minutes: self.duration_minutes,
            cost: self.cost,
            sentiment: self.sentiment,
            summary: self.summary,
            transcript: self.transcript,
            recording_url: self.recording_url,
            structured_data: self.structured_data,
            started_at: self.started_at,
            ended_at: self.ended_at,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Turns provider webhooks into stored call records.
pub struct CallEventNormalizer {
    records: Arc<dyn CallRecordStore>,
    tenants: TenantResolver,
    cost_per_second: f64,
}

impl CallEventNormalizer {
    pub fn new(records: Arc<dyn CallRecordStore>, tenants: TenantResolver, config: &IngestConfig) -> Self {
        Self {
            records,
            tenants,
            cost_per_second: config.cost_per_second,
        }
    }

    pub fn tenants(&self) -> &TenantResolver {
        &self.tenants
    }

    /// Normalizes and stores one webhook delivery.
    ///
    /// Every accepted delivery appends a new record, so a redelivered report
    /// is stored twice. When the call was placed by a campaign its job is
    /// moved to `completed`.
    pub async fn ingest(&self, payload: &Value) -> Result<CallRecord, CallcastError> {
        let event = CallEvent::from_payload(payload, self.cost_per_second)?;
        let tenant_id = self
            .tenants
            .resolve(event.assistant_id.as_deref(), event.phone_number_id.as_deref())
            .await;

        let record = event.into_record(tenant_id);
        self.records.insert_call_record(&record).await?;

        if !record.call_id.is_empty() {
            match self.records.complete_job_for_call(&record.call_id).await {
                Ok(0) => debug!(call_id = %record.call_id, "no campaign job for call"),
                Ok(_) => debug!(call_id = %record.call_id, "campaign job completed"),
                Err(e) => warn!(call_id = %record.call_id, error = %e, "failed to complete campaign job"),
            }
        }

        info!(
            call_id = %record.call_id,
            tenant_id = %record.tenant_id,
            direction = %record.direction,
            sentiment = %record.sentiment,
            ended_reason = %record.ended_reason,
            "call report stored"
        );
        Ok(record)
    }
}
