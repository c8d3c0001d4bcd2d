// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles the provider webhook, tenant registration, the campaign API, call
//! record queries, and the public health check.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use callcast_campaign::{
    ContactList, create_campaign, register_assistant, register_phone_number, register_tenant,
};
use callcast_core::types::{
    Assistant, CallDirection, CallFilter, CallOutcome, CallRecord, Campaign, CampaignJob,
    DispatchSummary, HealthStatus, NewAssistant, NewCampaign, NewPhoneNumber, NewTenant,
    PhoneNumber, Sentiment, Tenant,
};
use callcast_core::CallcastError;
use callcast_ingest::derive::utc_timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{ApiError, ErrorResponse};
use crate::server::GatewayState;

/// Query-string prefix selecting a structured-data equality filter.
pub const STRUCTURED_DATA_PREFIX: &str = "data.";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when storage is healthy, otherwise `degraded` or `unhealthy`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Storage detail when not healthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

/// Response body for an accepted webhook.
#[derive(Debug, Serialize)]
pub struct CallReportAck {
    pub success: bool,
    pub message: String,
    pub data: CallRecord,
}

/// Request body for POST /v1/campaigns.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub assistant_id: String,
    pub phone_number_id: String,
    #[serde(default)]
    pub csv_file_name: Option<String>,
    /// Contact list text, header row first.
    pub csv: String,
}

/// Request body for POST /v1/campaigns/{id}/start.
///
/// Exactly one of `csv` or `contacts` is expected; `csv` wins when both are
/// present.
#[derive(Debug, Default, Deserialize)]
pub struct StartCampaignRequest {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub contacts: Option<Vec<Map<String, Value>>>,
}

impl StartCampaignRequest {
    pub fn into_contacts(self) -> Result<ContactList, ApiError> {
        match (self.csv, self.contacts) {
            (Some(csv), _) => Ok(ContactList::parse(&csv)?),
            (None, Some(contacts)) => Ok(ContactList::from_json_rows(&contacts)?),
            (None, None) => Err(ApiError::BadRequest(
                "request body must carry `csv` or `contacts`".into(),
            )),
        }
    }
}

/// A campaign together with its jobs.
#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub settled: bool,
    pub jobs: Vec<CampaignJob>,
}

/// Query string for GET /v1/campaigns.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    #[serde(default)]
    pub tenant_id: Option<String>,
}

/// Response body for GET /v1/campaigns.
#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub count: usize,
    pub campaigns: Vec<Campaign>,
}

/// A call record with its display outcome.
#[derive(Debug, Serialize)]
pub struct CallView {
    #[serde(flatten)]
    pub record: CallRecord,
    pub outcome: CallOutcome,
}

/// Response body for GET /v1/calls.
#[derive(Debug, Serialize)]
pub struct CallListResponse {
    pub count: usize,
    pub calls: Vec<CallView>,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let storage = state.health.storage.health_check().await;
    let (code, status, detail) = match storage {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok", None),
        Ok(HealthStatus::Degraded(reason)) => (StatusCode::OK, "degraded", Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => {
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(reason))
        }
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", Some(e.to_string())),
    };
    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.health.start_time.elapsed().as_secs(),
            storage: detail,
        }),
    )
        .into_response()
}

/// POST /v1/webhooks/call-report
///
/// Checks the webhook secret before reading the body, then normalizes and
/// stores the report.
pub async fn post_call_report(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallReportAck>, ApiError> {
    if !state.auth.webhook_authorized(&headers) {
        warn!("webhook rejected: missing or wrong secret");
        return Err(ApiError::Unauthorized);
    }

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("webhook body is not JSON: {e}")))?;
    let record = state.normalizer.ingest(&payload).await?;

    Ok(Json(CallReportAck {
        success: true,
        message: "Call report received and stored successfully".to_string(),
        data: record,
    }))
}

/// OPTIONS /v1/webhooks/call-report
pub async fn call_report_preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the webhook route.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            details: None,
        }),
    )
}

/// POST /v1/tenants
pub async fn post_tenant(
    State(state): State<GatewayState>,
    Json(body): Json<NewTenant>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    let tenant = register_tenant(state.directory.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// POST /v1/assistants
pub async fn post_assistant(
    State(state): State<GatewayState>,
    Json(body): Json<NewAssistant>,
) -> Result<(StatusCode, Json<Assistant>), ApiError> {
    let assistant = register_assistant(state.directory.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(assistant)))
}

/// POST /v1/phone-numbers
pub async fn post_phone_number(
    State(state): State<GatewayState>,
    Json(body): Json<NewPhoneNumber>,
) -> Result<(StatusCode, Json<PhoneNumber>), ApiError> {
    let phone_number = register_phone_number(state.directory.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(phone_number)))
}

/// GET /v1/campaigns
pub async fn list_campaigns(
    State(state): State<GatewayState>,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<CampaignListResponse>, ApiError> {
    let campaigns = state
        .campaigns
        .list_campaigns(query.tenant_id.as_deref())
        .await?;
    Ok(Json(CampaignListResponse {
        count: campaigns.len(),
        campaigns,
    }))
}

/// POST /v1/campaigns
pub async fn post_campaign(
    State(state): State<GatewayState>,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let contacts = ContactList::parse(&body.csv)?;
    let campaign = create_campaign(
        state.campaigns.as_ref(),
        NewCampaign {
            tenant_id: body.tenant_id,
            name: body.name,
            assistant_id: body.assistant_id,
            phone_number_id: body.phone_number_id,
            csv_file_name: body.csv_file_name,
        },
        &contacts,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// POST /v1/campaigns/{id}/start
///
/// Runs the whole dispatch before responding.
pub async fn post_campaign_start(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<StartCampaignRequest>,
) -> Result<Json<DispatchSummary>, ApiError> {
    let contacts = body.into_contacts()?;
    info!(campaign_id = %id, contacts = contacts.len(), "starting campaign via API");
    let summary = state.dispatcher.start_campaign(&id, &contacts.rows).await?;
    Ok(Json(summary))
}

/// GET /v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignDetail>, ApiError> {
    let campaign = state
        .campaigns
        .get_campaign(&id)
        .await?
        .ok_or_else(|| CallcastError::not_found("campaign", &id))?;
    let jobs = state.campaigns.list_jobs(&id).await?;
    Ok(Json(CampaignDetail {
        settled: campaign.is_settled(),
        campaign,
        jobs,
    }))
}

/// GET /v1/calls
pub async fn list_calls(
    State(state): State<GatewayState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CallListResponse>, ApiError> {
    let filter = call_filter(params)?;
    let calls: Vec<CallView> = state
        .calls
        .list_call_records(&filter)
        .await?
        .into_iter()
        .map(|record| CallView {
            outcome: record.outcome(),
            record,
        })
        .collect();
    Ok(Json(CallListResponse {
        count: calls.len(),
        calls,
    }))
}

/// Builds a [`CallFilter`] from query-string pairs.
///
/// `data.<key>=<value>` adds a structured-data equality pair; the value is
/// read as JSON when it parses and as a string otherwise. Time bounds accept
/// RFC 3339 or `YYYY-MM-DD` and are compared in UTC.
pub fn call_filter(params: Vec<(String, String)>) -> Result<CallFilter, ApiError> {
    let mut filter = CallFilter::default();
    for (key, value) in params {
        match key.as_str() {
            "tenant_id" => filter.tenant_id = Some(value),
            "agent" => filter.agent = Some(value),
            "direction" => filter.direction = Some(parse_enum::<CallDirection>(&key, &value)?),
            "ended_reason" => filter.ended_reason = Some(value),
            "sentiment" => filter.sentiment = Some(parse_enum::<Sentiment>(&key, &value)?),
            "from_number" => filter.from_number = Some(value),
            "to_number" => filter.to_number = Some(value),
            "started_after" => filter.started_after = Some(parse_timestamp(&key, &value)?),
            "started_before" => filter.started_before = Some(parse_timestamp(&key, &value)?),
            "campaign_id" => filter.campaign_id = Some(value),
            other => match other.strip_prefix(STRUCTURED_DATA_PREFIX) {
                Some(field) if !field.is_empty() => {
                    let parsed = serde_json::from_str(&value).unwrap_or(Value::String(value));
                    filter.structured_data.push((field.to_string(), parsed));
                }
                _ => return Err(ApiError::BadRequest(format!("unknown filter `{other}`"))),
            },
        }
    }
    Ok(filter)
}

fn parse_timestamp(key: &str, value: &str) -> Result<String, ApiError> {
    utc_timestamp(value)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid timestamp `{value}` for `{key}`")))
}

fn parse_enum<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid value `{value}` for `{key}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn call_filter_reads_every_key() {
        let filter = call_filter(pairs(&[
            ("tenant_id", "acme"),
            ("direction", "outbound"),
            ("sentiment", "negative"),
            ("from_number", "555"),
            ("campaign_id", "c1"),
            ("data.hasVoicemailMessage", "true"),
            ("data.reason", "price"),
        ]))
        .unwrap();

        assert_eq!(filter.tenant_id.as_deref(), Some("acme"));
        assert_eq!(filter.direction, Some(CallDirection::Outbound));
        assert_eq!(filter.sentiment, Some(Sentiment::Negative));
        assert_eq!(filter.from_number.as_deref(), Some("555"));
        assert_eq!(filter.campaign_id.as_deref(), Some("c1"));
        assert_eq!(
            filter.structured_data,
            vec![
                ("hasVoicemailMessage".to_string(), json!(true)),
                ("reason".to_string(), json!("price")),
            ]
        );
    }

    #[test]
    fn call_filter_normalizes_time_bounds() {
        let filter = call_filter(pairs(&[
            ("started_after", "2026-01-02T12:00:00+02:00"),
            ("started_before", "2026-01-03"),
        ]))
        .unwrap();
        assert_eq!(filter.started_after.as_deref(), Some("2026-01-02T10:00:00.000Z"));
        assert_eq!(filter.started_before.as_deref(), Some("2026-01-03T00:00:00.000Z"));

        assert!(matches!(
            call_filter(pairs(&[("started_after", "last tuesday")])),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn call_filter_rejects_unknown_keys_and_bad_enums() {
        assert!(matches!(
            call_filter(pairs(&[("colour", "red")])),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            call_filter(pairs(&[("data.", "x")])),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            call_filter(pairs(&[("direction", "sideways")])),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn start_request_needs_contacts() {
        let body: StartCampaignRequest = serde_json::from_str("{}").unwrap();
        assert!(matches!(body.into_contacts(), Err(ApiError::BadRequest(_))));

        let body: StartCampaignRequest =
            serde_json::from_str(r#"{"contacts": [{"phone": "+15550000001", "name": "Ada"}]}"#)
                .unwrap();
        let contacts = body.into_contacts().unwrap();
        assert_eq!(contacts.rows[0].phone_number(), Some("+15550000001"));

        let body = StartCampaignRequest {
            csv: Some("name\nAda\n".into()),
            contacts: None,
        };
        assert!(matches!(
            body.into_contacts(),
            Err(ApiError::Domain(CallcastError::MissingColumn { .. }))
        ));
    }

    #[test]
    fn create_request_deserializes() {
        let body: CreateCampaignRequest = serde_json::from_str(
            r#"{"name": "Spring", "assistant_id": "a1", "phone_number_id": "p1", "csv": "phone\n+1"}"#,
        )
        .unwrap();
        assert_eq!(body.name, "Spring");
        assert!(body.tenant_id.is_none());
        assert!(body.csv_file_name.is_none());
    }
}
