// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the gateway with in-memory adapters.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use callcast_campaign::{DispatchSettings, Dispatcher};
use callcast_config::model::IngestConfig;
use callcast_core::{CampaignStore, TenantDirectory};
use callcast_gateway::{AuthConfig, GatewayState, HealthState, WEBHOOK_PATH, build_router};
use callcast_ingest::{CallEventNormalizer, TenantResolver};
use callcast_test_utils::fixtures::{self, ASSISTANT_ID, PHONE_NUMBER_ID, PROVIDER_ASSISTANT_ID, TENANT_ID};
use callcast_test_utils::{MemoryStore, MockCallProvider};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "admin-token";

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    provider: Arc<MockCallProvider>,
}

async fn harness(auth: AuthConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    fixtures::seed_directory(store.as_ref()).await.unwrap();
    let provider = Arc::new(MockCallProvider::new().failing_numbers(["+15550000003"]));

    let dispatcher = Dispatcher::new(
        store.clone(),
        provider.clone(),
        DispatchSettings {
            batch_size: 5,
            batch_delay: std::time::Duration::ZERO,
        },
    );
    let normalizer = CallEventNormalizer::new(
        store.clone(),
        TenantResolver::new(store.clone(), "default"),
        &IngestConfig::default(),
    );

    let state = GatewayState {
        campaigns: store.clone(),
        calls: store.clone(),
        directory: store.clone(),
        dispatcher: Arc::new(dispatcher),
        normalizer: Arc::new(normalizer),
        auth,
        health: HealthState {
            start_time: Instant::now(),
            storage: store.clone(),
        },
    };
    Harness {
        app: build_router(state),
        store,
        provider,
    }
}

fn admin() -> AuthConfig {
    AuthConfig {
        bearer_token: Some(TOKEN.into()),
        webhook_secret: None,
    }
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
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

fn end_of_call(call_id: &str) -> Value {
    json!({
        "message": {
            "type": "end-of-call-report",
            "call": {"id": call_id, "type": "outboundPhoneCall"},
            "assistant": {"id": PROVIDER_ASSISTANT_ID, "name": "Riley"},
            "endedReason": "customer-ended-call",
            "durationMinutes": 10,
            "analysis": {"successEvaluation": 8}
        }
    })
}

#[tokio::test]
async fn health_is_public() {
    let h = harness(AuthConfig::default()).await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn admin_api_is_fail_closed_without_token() {
    let h = harness(AuthConfig::default()).await;
    let (status, _) = send(&h.app, get("/v1/calls")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let h = harness(admin()).await;
    let request = Request::builder()
        .uri("/v1/calls")
        .header("authorization", "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn campaign_create_start_and_inspect() {
    let h = harness(admin()).await;
    let csv = "name,phone_number\nAda,+15550000001\nGrace,+15550000002\nLinus,+15550000003\n";

    let (status, campaign) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/campaigns",
            &json!({
                "name": "Spring",
                "assistant_id": ASSISTANT_ID,
                "phone_number_id": PHONE_NUMBER_ID,
                "csv_file_name": "leads.csv",
                "csv": csv,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["status"], "pending");
    assert_eq!(campaign["total_numbers"], 3);
    assert_eq!(campaign["tenant_id"], TENANT_ID);
    let id = campaign["id"].as_str().unwrap().to_string();

    let (status, summary) = send(
        &h.app,
        json_request(
            Method::POST,
            &format!("/v1/campaigns/{id}/start"),
            &json!({ "csv": csv }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({"success_count": 2, "fail_count": 1}));
    assert_eq!(h.provider.calls().await.len(), 3);

    let (status, detail) = send(&h.app, get(&format!("/v1/campaigns/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "running");
    assert_eq!(detail["settled"], true);
    assert_eq!(detail["jobs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn campaign_errors_map_to_statuses() {
    let h = harness(admin()).await;

    let (status, body) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/campaigns",
            &json!({
                "name": "No phones",
                "assistant_id": ASSISTANT_ID,
                "phone_number_id": PHONE_NUMBER_ID,
                "csv": "name,email\nAda,ada@example.com\n",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid contact list");

    let (status, _) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/campaigns/missing/start",
            &json!({"contacts": [{"phone": "+15550000001"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(h.provider.calls().await.is_empty());

    let (status, _) = send(&h.app, get("/v1/campaigns/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn webhook_stores_report_and_calls_are_queryable() {
    let h = harness(admin()).await;
    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .body(Body::from(end_of_call("call_1").to_string()))
        .unwrap();

    let (status, body) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["tenant_id"], TENANT_ID);
    assert_eq!(body["data"]["sentiment"], "positive");

    let (status, body) = send(&h.app, get("/v1/calls?sentiment=positive&direction=outbound")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["calls"][0]["call_id"], "call_1");
    assert_eq!(body["calls"][0]["outcome"], "Completed");

    let (status, body) = send(&h.app, get("/v1/calls?sentiment=sideways")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid request format");
}

#[tokio::test]
async fn webhook_rejections() {
    let h = harness(admin()).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .body(Body::from(json!({"message": {"type": "status-update"}}).to_string()))
        .unwrap();
    let (status, body) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid webhook type");

    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .body(Body::from("not json"))
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::GET)
        .uri(WEBHOOK_PATH)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(WEBHOOK_PATH)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);

    assert!(h.store.records().await.is_empty());
}

#[tokio::test]
async fn webhook_secret_is_enforced_when_configured() {
    let h = harness(AuthConfig {
        bearer_token: Some(TOKEN.into()),
        webhook_secret: Some("hook".into()),
    })
    .await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .body(Body::from(end_of_call("call_2").to_string()))
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header("x-vapi-secret", "hook")
        .body(Body::from(end_of_call("call_2").to_string()))
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.store.records().await.len(), 1);
}

#[tokio::test]
async fn registered_resources_back_campaigns_and_attribution() {
    let h = harness(admin()).await;

    let (status, tenant) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/tenants",
            &json!({"id": "globex", "name": "Globex", "email": "ops@globex.test"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tenant["is_active"], true);

    let (status, assistant) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/assistants",
            &json!({"tenant_id": "globex", "provider_assistant_id": "asst_globex", "name": "Morgan"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let assistant_id = assistant["id"].as_str().unwrap().to_string();

    let (status, phone) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/phone-numbers",
            &json!({
                "id": "p-globex",
                "tenant_id": "globex",
                "provider_phone_number_id": "pn_globex",
                "number": "+15550109999",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(phone["tenant_id"], "globex");

    let (status, campaign) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/campaigns",
            &json!({
                "name": "Globex launch",
                "assistant_id": assistant_id,
                "phone_number_id": "p-globex",
                "csv": "phone\n+15550000001\n",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["tenant_id"], "globex");

    let report = json!({
        "message": {
            "type": "end-of-call-report",
            "call": {"id": "call_g1", "type": "outboundPhoneCall"},
            "assistant": {"id": "asst_globex", "name": "Morgan"},
            "endedReason": "customer-ended-call"
        }
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .body(Body::from(report.to_string()))
        .unwrap();
    let (status, ack) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["data"]["tenant_id"], "globex");
}

#[tokio::test]
async fn campaigns_are_listed_per_tenant() {
    let h = harness(admin()).await;
    let mut other = fixtures::campaign("c-other", 1);
    other.tenant_id = Some("globex".into());
    other.created_at = "2026-02-01T00:00:00.000Z".into();
    h.store.create_campaign(&fixtures::campaign("c-acme", 2)).await.unwrap();
    h.store.create_campaign(&other).await.unwrap();

    let (status, body) = send(&h.app, get("/v1/campaigns")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["campaigns"][0]["id"], "c-other");

    let (status, body) = send(&h.app, get(&format!("/v1/campaigns?tenant_id={TENANT_ID}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["campaigns"][0]["id"], "c-acme");

    let request = Request::builder().uri("/v1/campaigns").body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_rejections() {
    let h = harness(admin()).await;

    let (status, body) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/assistants",
            &json!({"tenant_id": "nobody", "provider_assistant_id": "asst_x", "name": "X"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");

    let (status, body) = send(
        &h.app,
        json_request(
            Method::POST,
            "/v1/phone-numbers",
            &json!({"tenant_id": TENANT_ID, "provider_phone_number_id": " ", "number": "+15550100001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid request format");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/tenants")
        .header("content-type", "application/json")
        .body(Body::from(json!({"id": "initech", "name": "Initech"}).to_string()))
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(h.store.get_tenant("initech").await.unwrap().is_none());
}

#[tokio::test]
async fn start_time_filter_compares_instants_across_offsets() {
    let h = harness(admin()).await;
    for (call_id, started_at) in [
        ("call_early", "2026-01-02T11:30:00+02:00"),
        ("call_late", "2026-01-02T06:00:00-05:00"),
    ] {
        let mut report = end_of_call(call_id);
        report["message"]["startedAt"] = json!(started_at);
        let request = Request::builder()
            .method(Method::POST)
            .uri(WEBHOOK_PATH)
            .header("content-type", "application/json")
            .body(Body::from(report.to_string()))
            .unwrap();
        let (status, _) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    // 10:00 UTC sits between 09:30 UTC and 11:00 UTC.
    let (status, body) = send(
        &h.app,
        get("/v1/calls?started_after=2026-01-02T12:00:00%2B02:00"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["calls"][0]["call_id"], "call_late");
    assert_eq!(body["calls"][0]["started_at"], "2026-01-02T11:00:00.000Z");

    let (status, body) = send(&h.app, get("/v1/calls?started_before=2026-01-02T10:00:00Z")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["calls"][0]["call_id"], "call_early");
}
