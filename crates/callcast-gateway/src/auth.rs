// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication for the gateway.
//!
//! The admin API requires `Authorization: Bearer <token>`. When no token is
//! configured every admin request is rejected (fail-closed).
//!
//! Provider webhooks are checked separately against an optional shared
//! secret carried in the `x-vapi-secret` header.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

/// Header the provider uses to carry the webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-vapi-secret";

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected admin bearer token. `None` rejects all admin requests.
    pub bearer_token: Option<String>,
    /// Expected webhook secret. `None` accepts all webhooks.
    pub webhook_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl AuthConfig {
    /// Whether `headers` carry the configured webhook secret.
    pub fn webhook_authorized(&self, headers: &HeaderMap) -> bool {
        match self.webhook_secret.as_deref() {
            None => true,
            Some(expected) => headers
                .get(WEBHOOK_SECRET_HEADER)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|given| given == expected),
        }
    }
}

/// Middleware that validates the admin bearer token.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected_token) = auth.bearer_token.as_deref() else {
        tracing::error!("gateway has no bearer token configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if token == Some(expected_token) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
