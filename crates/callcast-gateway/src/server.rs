// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use callcast_campaign::Dispatcher;
use callcast_config::model::GatewayConfig;
use callcast_core::{CallRecordStore, CallcastError, CampaignStore, PluginAdapter, TenantDirectory};
use callcast_ingest::CallEventNormalizer;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Path of the provider webhook endpoint.
pub const WEBHOOK_PATH: &str = "/v1/webhooks/call-report";

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Storage adapter whose health is reported.
    pub storage: Arc<dyn PluginAdapter>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub campaigns: Arc<dyn CampaignStore>,
    pub calls: Arc<dyn CallRecordStore>,
    pub directory: Arc<dyn TenantDirectory>,
    pub dispatcher: Arc<Dispatcher>,
    pub normalizer: Arc<CallEventNormalizer>,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Address the gateway binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

impl From<&GatewayConfig> for AuthConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            bearer_token: config.bearer_token.clone(),
            webhook_secret: config.webhook_secret.clone(),
        }
    }
}

/// Builds the gateway router.
///
/// - GET /health (public)
/// - POST|OPTIONS /v1/webhooks/call-report (webhook secret, checked in the handler)
/// - POST /v1/tenants, POST /v1/assistants, POST /v1/phone-numbers,
///   GET|POST /v1/campaigns, POST /v1/campaigns/{id}/start,
///   GET /v1/campaigns/{id}, GET /v1/calls (bearer auth)
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            WEBHOOK_PATH,
            post(handlers::post_call_report)
                .options(handlers::call_report_preflight)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/tenants", post(handlers::post_tenant))
        .route("/v1/assistants", post(handlers::post_assistant))
        .route("/v1/phone-numbers", post(handlers::post_phone_number))
        .route(
            "/v1/campaigns",
            get(handlers::list_campaigns).post(handlers::post_campaign),
        )
        .route("/v1/campaigns/{id}", get(handlers::get_campaign))
        .route("/v1/campaigns/{id}/start", post(handlers::post_campaign_start))
        .route("/v1/calls", get(handlers::list_calls))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the gateway until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), CallcastError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CallcastError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| CallcastError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}
