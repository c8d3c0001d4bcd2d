// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vapi call-creation request and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallRequest {
    pub assistant_id: String,
    pub phone_number_id: String,
    pub customer: Customer,
    pub assistant_overrides: AssistantOverrides,
}

/// The number being dialled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub number: String,
}

/// Per-call overrides; only template variables are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOverrides {
    pub variable_values: Map<String, Value>,
}

/// The subset of the created call object that callcast reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCallResponse {
    pub id: Option<String>,
}

/// Error body returned by the Vapi API. `message` is a string or a list of
/// validation messages.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    /// Flatten the message into one line.
    pub fn describe(&self) -> String {
        let message = match &self.message {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        match (&self.error, message.is_empty()) {
            (Some(kind), false) => format!("{kind}: {message}"),
            (Some(kind), true) => kind.clone(),
            (None, _) => message,
        }
    }
}
