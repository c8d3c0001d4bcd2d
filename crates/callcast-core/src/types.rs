// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the store traits, the dispatch engine, and the
//! webhook normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    CallProvider,
}

// --- Directory records ---

/// A client organization owning assistants, phone numbers, campaigns and calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
}

/// A calling assistant registered with the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assistant {
    /// Local record id (what campaigns reference).
    pub id: String,
    pub tenant_id: Option<String>,
    /// Identifier issued by the calling provider.
    pub provider_assistant_id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

/// An outbound caller-id phone number registered with the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Local record id (what campaigns reference).
    pub id: String,
    pub tenant_id: Option<String>,
    /// Identifier issued by the calling provider.
    pub provider_phone_number_id: String,
    pub number: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
}

// --- Campaigns ---

/// Campaign lifecycle status.
///
/// There is no terminal success value: a campaign whose jobs have
/// all resolved stays `running`, see [`Campaign::is_settled`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Pending,
    Running,
    Failed,
}

/// A batch of outbound calls created from one uploaded contact list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub tenant_id: Option<String>,
    pub name: String,
    /// Local assistant record id.
    pub assistant_id: String,
    /// Local phone number record id.
    pub phone_number_id: String,
    pub csv_file_name: Option<String>,
    pub total_numbers: i64,
    pub completed_calls: i64,
    pub failed_calls: i64,
    pub status: CampaignStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Campaign {
    /// Whether every job has resolved one way or the other.
    pub fn is_settled(&self) -> bool {
        self.completed_calls + self.failed_calls == self.total_numbers
    }
}

/// Input for creating a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCampaign {
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub name: String,
    pub assistant_id: String,
    pub phone_number_id: String,
    #[serde(default)]
    pub csv_file_name: Option<String>,
}

/// Input for registering a tenant. A missing id is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTenant {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// Input for registering an assistant under an existing tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssistant {
    #[serde(default)]
    pub id: Option<String>,
    pub tenant_id: String,
    pub provider_assistant_id: String,
    pub name: String,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// Input for registering a phone number under an existing tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPhoneNumber {
    #[serde(default)]
    pub id: Option<String>,
    pub tenant_id: String,
    pub provider_phone_number_id: String,
    pub number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

/// Aggregate counters and status written back by the dispatch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignProgress {
    pub total_numbers: i64,
    pub completed_calls: i64,
    pub failed_calls: i64,
    pub status: CampaignStatus,
}

/// Per-contact job status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Calling,
    Completed,
    Failed,
}

/// One contact row mapped to one outbound call, keyed by
/// `(campaign_id, phone_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignJob {
    pub campaign_id: String,
    pub phone_number: String,
    /// Call-time substitution variables (source row minus the phone column).
    pub variables: Map<String, Value>,
    pub status: JobStatus,
    /// Provider call id, set once the provider accepted the call.
    pub call_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Result of one `start_campaign` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub success_count: usize,
    pub fail_count: usize,
}

// --- Provider calls ---

/// An outbound call to place through the calling provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    /// Provider-issued assistant identifier.
    pub assistant_id: String,
    /// Provider-issued phone number identifier.
    pub phone_number_id: String,
    /// Destination number.
    pub customer_number: String,
    pub variables: Map<String, Value>,
}

/// A call the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCall {
    pub call_id: String,
}

// --- Call records ---

/// Direction of a call relative to the tenant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

/// Sentiment derived from the provider's success evaluation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Canonical record of one ended call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Local row id; provider call ids are not unique across deliveries.
    pub id: String,
    pub call_id: String,
    pub tenant_id: String,
    pub agent: String,
    pub from_number: String,
    pub to_number: String,
    pub direction: CallDirection,
    /// Raw provider end reason.
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
    pub created_at: String,
}

impl CallRecord {
    /// Display outcome derived from the end reason and voicemail flag.
    pub fn outcome(&self) -> CallOutcome {
        let left_message = self
            .structured_data
            .get("hasVoicemailMessage")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        CallOutcome::from_ended_reason(&self.ended_reason, left_message)
    }
}

/// Human-facing classification of a provider end reason.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CallOutcome {
    Completed,
    Busy,
    #[strum(serialize = "No Answer")]
    #[serde(rename = "No Answer")]
    NoAnswer,
    #[strum(serialize = "Left Voicemail")]
    #[serde(rename = "Left Voicemail")]
    LeftVoicemail,
    #[strum(serialize = "Hangup On Voicemail")]
    #[serde(rename = "Hangup On Voicemail")]
    HangupOnVoicemail,
    Failed,
}

impl CallOutcome {
    pub fn from_ended_reason(reason: &str, has_voicemail_message: bool) -> Self {
        match reason {
            "customer-busy" => Self::Busy,
            "customer-ended-call" | "assistant-ended-call" => Self::Completed,
            "customer-did-not-answer" => Self::NoAnswer,
            "voicemail" if has_voicemail_message => Self::LeftVoicemail,
            "voicemail" => Self::HangupOnVoicemail,
            _ => Self::Failed,
        }
    }
}

/// Conjunctive filter for call record queries. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallFilter {
    pub tenant_id: Option<String>,
    pub agent: Option<String>,
    pub direction: Option<CallDirection>,
    pub ended_reason: Option<String>,
    pub sentiment: Option<Sentiment>,
    /// Substring match on the originating number.
    pub from_number: Option<String>,
    /// Substring match on the destination number.
    pub to_number: Option<String>,
    /// Inclusive lower bound on `started_at`, in the stored UTC form
    /// (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
    pub started_after: Option<String>,
    /// Inclusive upper bound on `started_at`, in the stored UTC form.
    pub started_before: Option<String>,
    /// Only calls linked to this campaign's jobs.
    pub campaign_id: Option<String>,
    /// Key/value pairs that must appear in the structured data.
    #[serde(default)]
    pub structured_data: Vec<(String, Value)>,
}
