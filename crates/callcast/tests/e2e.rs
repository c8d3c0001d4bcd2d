// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end flow over SQLite storage, the Vapi client against a mock
//! provider, and the gateway router.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use callcast_campaign::{DispatchSettings, Dispatcher};
use callcast_config::CallcastConfig;
use callcast_core::types::JobStatus;
use callcast_core::{CampaignStore, PluginAdapter};
use callcast_gateway::{AuthConfig, GatewayState, HealthState, WEBHOOK_PATH, build_router};
use callcast_ingest::{CallEventNormalizer, TenantResolver};
use callcast_storage::SqliteStorage;
use callcast_test_utils::fixtures::{
    self, ASSISTANT_ID, PHONE_NUMBER_ID, PROVIDER_ASSISTANT_ID, PROVIDER_PHONE_NUMBER_ID,
    TENANT_ID,
};
use callcast_vapi::VapiProvider;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "e2e-token";
const SECRET: &str = "e2e-secret";

struct Stack {
    app: Router,
    storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

async fn stack(provider_url: &str) -> Stack {
    let dir = tempfile::tempdir().unwrap();
    let mut config = CallcastConfig::default();
    config.storage.database_path = dir.path().join("callcast.db").display().to_string();
    config.provider.api_key = Some("vapi-test-key".into());
    config.provider.base_url = provider_url.to_string();
    config.gateway.bearer_token = Some(TOKEN.into());
    config.gateway.webhook_secret = Some(SECRET.into());

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await.unwrap();
    let storage = Arc::new(storage);
    fixtures::seed_directory(storage.as_ref()).await.unwrap();

    let provider = Arc::new(VapiProvider::new(&config.provider).unwrap());
    let dispatcher = Dispatcher::new(
        storage.clone(),
        provider,
        DispatchSettings {
            batch_delay: Duration::ZERO,
            ..DispatchSettings::from(&config.dispatch)
        },
    );
    let normalizer = CallEventNormalizer::new(
        storage.clone(),
        TenantResolver::new(storage.clone(), config.tenancy.default_tenant_id.clone()),
        &config.ingest,
    );

    let state = GatewayState {
        campaigns: storage.clone(),
        calls: storage.clone(),
        directory: storage.clone(),
        dispatcher: Arc::new(dispatcher),
        normalizer: Arc::new(normalizer),
        auth: AuthConfig::from(&config.gateway),
        health: HealthState {
            start_time: Instant::now(),
            storage: storage.clone(),
        },
    };

    Stack {
        app: build_router(state),
        storage,
        _dir: dir,
    }
}

async fn mock_provider() -> MockServer {
    let server = MockServer::start().await;
    for (number, id) in [("+15550000001", "call_1"), ("+15550000002", "call_2")] {
        Mock::given(method("POST"))
            .and(path("/call"))
            .and(body_partial_json(json!({
                "assistantId": PROVIDER_ASSISTANT_ID,
                "phoneNumberId": PROVIDER_PHONE_NUMBER_ID,
                "customer": {"number": number},
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": id})))
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/call"))
        .and(body_partial_json(json!({"customer": {"number": "+15550000003"}})))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": ["customer.number must be valid"]})),
        )
        .mount(&server)
        .await;
    server
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn admin_post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn campaign_dispatch_then_webhook_completes_job() {
    let provider = mock_provider().await;
    let s = stack(&provider.uri()).await;
    let csv = "first_name,Phone Number\nAda,+15550000001\nGrace,+15550000002\nLinus,+15550000003\n";

    let (status, campaign) = send(
        &s.app,
        admin_post(
            "/v1/campaigns",
            &json!({
                "name": "Spring outreach",
                "assistant_id": ASSISTANT_ID,
                "phone_number_id": PHONE_NUMBER_ID,
                "csv_file_name": "spring.csv",
                "csv": csv,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = campaign["id"].as_str().unwrap().to_string();

    let (status, summary) = send(
        &s.app,
        admin_post(&format!("/v1/campaigns/{id}/start"), &json!({ "csv": csv })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({"success_count": 2, "fail_count": 1}));
    assert_eq!(provider.received_requests().await.unwrap().len(), 3);

    let report = json!({
        "message": {
            "type": "end-of-call-report",
            "call": {"id": "call_1", "type": "outboundPhoneCall"},
            "assistant": {"id": PROVIDER_ASSISTANT_ID, "name": "Riley"},
            "endedReason": "customer-ended-call",
            "durationMinutes": 1.5,
            "summary": "Booked a demo",
            "analysis": {"successEvaluation": true}
        }
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .header("x-vapi-secret", SECRET)
        .body(Body::from(report.to_string()))
        .unwrap();
    let (status, ack) = send(&s.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["data"]["tenant_id"], TENANT_ID);
    assert_eq!(ack["data"]["sentiment"], "positive");

    let jobs = s.storage.list_jobs(&id).await.unwrap();
    let status_of = |number: &str| {
        jobs.iter()
            .find(|job| job.phone_number == number)
            .map(|job| job.status)
    };
    assert_eq!(status_of("+15550000001"), Some(JobStatus::Completed));
    assert_eq!(status_of("+15550000002"), Some(JobStatus::Calling));
    assert_eq!(status_of("+15550000003"), Some(JobStatus::Failed));

    let (status, calls) = send(&s.app, admin_get(&format!("/v1/calls?tenant_id={TENANT_ID}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls["count"], 1);
    assert_eq!(calls["calls"][0]["summary"], "Booked a demo");

    s.storage.shutdown().await.unwrap();
}

#[tokio::test]
async fn health_reports_sqlite_status() {
    let provider = MockServer::start().await;
    let s = stack(&provider.uri()).await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&s.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
