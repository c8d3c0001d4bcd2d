// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `callcast serve`: runs the gateway until a shutdown signal arrives.

use std::time::Instant;

use callcast_config::CallcastConfig;
use callcast_core::{CallcastError, PluginAdapter};
use callcast_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig, start_server};
use tracing::{error, info, warn};

use crate::services::build_services;
use crate::shutdown;

/// Crates whose spans and events follow `service.log_level`.
const LOG_TARGETS: &[&str] = &[
    "callcast",
    "callcast_campaign",
    "callcast_config",
    "callcast_gateway",
    "callcast_ingest",
    "callcast_storage",
    "callcast_vapi",
];

/// Runs the gateway server with the configured adapters.
pub async fn run_serve(config: CallcastConfig) -> Result<(), CallcastError> {
    info!(name = %config.service.name, "starting callcast");

    if config.gateway.bearer_token.is_none() {
        warn!("gateway.bearer_token is not set, campaign and call routes will reject every request");
    }

    let services = build_services(&config).await?;
    let cancel = shutdown::install_signal_handler();

    let state = GatewayState {
        campaigns: services.storage.clone(),
        calls: services.storage.clone(),
        directory: services.storage.clone(),
        dispatcher: services.dispatcher.clone(),
        normalizer: services.normalizer.clone(),
        auth: AuthConfig::from(&config.gateway),
        health: HealthState {
            start_time: Instant::now(),
            storage: services.storage.clone(),
        },
    };

    let result = start_server(&ServerConfig::from(&config.gateway), state, cancel).await;

    if let Err(e) = services.storage.shutdown().await {
        error!(error = %e, "storage shutdown failed");
    }
    info!("callcast stopped");
    result
}

/// Initializes the tracing subscriber with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directives(log_level: &str) -> String {
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={log_level}"))
        .collect();
    directives.push("warn".into());
    directives.join(",")
}
