// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for callcast.
//!
//! Receives end-of-call webhooks from the calling provider and exposes a
//! bearer-authenticated API for creating and starting campaigns and querying
//! call records.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, ServerConfig, WEBHOOK_PATH, build_router, start_server};
