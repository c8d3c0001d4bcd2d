// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field resolver table for end-of-call reports.
//!
//! The provider has moved fields around over the life of its API, so every
//! field is looked up through an ordered list of candidate paths relative to
//! the report's `message` object. The first candidate holding a usable value
//! wins. `null` and empty strings count as absent.

use serde_json::{Map, Value};

/// A field extracted from an end-of-call report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CallId,
    Agent,
    FromNumber,
    ToNumber,
    CallType,
    EndedReason,
    DurationMinutes,
    Summary,
    Transcript,
    RecordingUrl,
    StructuredData,
    SuccessEvaluation,
    StartedAt,
    EndedAt,
    Cost,
    AssistantId,
    PhoneNumberId,
}

impl Field {
    /// Candidate paths in priority order, dot-separated, relative to `message`.
    pub const fn paths(self) -> &'static [&'static str] {
        match self {
            Field::CallId => &["call.id"],
            Field::Agent => &["assistant.name", "call.assistant.name"],
            Field::FromNumber => &["phoneNumber.number", "call.phoneNumber.number"],
            Field::ToNumber => &["customer.number", "call.customer.number"],
            Field::CallType => &["call.type", "type"],
            Field::EndedReason => &["endedReason", "call.endedReason"],
            Field::DurationMinutes => &["durationMinutes", "call.durationMinutes"],
            Field::Summary => &["summary", "analysis.summary", "call.analysis.summary"],
            Field::Transcript => &["transcript", "call.transcript"],
            Field::RecordingUrl => &[
                "recordingUrl",
                "stereoRecordingUrl",
                "call.recordingUrl",
                "call.stereoRecordingUrl",
            ],
            Field::StructuredData => &["analysis.structuredData", "call.analysis.structuredData"],
            Field::SuccessEvaluation => {
                &["analysis.successEvaluation", "call.analysis.successEvaluation"]
            }
            Field::StartedAt => &["startedAt", "call.startedAt"],
            Field::EndedAt => &["endedAt", "call.endedAt"],
            Field::Cost => &["cost"],
            Field::AssistantId => &["assistant.id", "call.assistant.id"],
            Field::PhoneNumberId => &["phoneNumber.id", "call.phoneNumber.id"],
        }
    }
}

/// Follows a dot-separated object path. Missing keys, non-object parents, and
/// `null` leaves all yield `None`.
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))
        .filter(|value| !value.is_null())
}

/// First candidate of `field` that `convert` accepts.
pub fn resolve<'a, T>(
    message: &'a Value,
    field: Field,
    convert: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    field
        .paths()
        .iter()
        .find_map(|path| lookup(message, path).and_then(&convert))
}

/// First non-empty string value of `field`.
pub fn text<'a>(message: &'a Value, field: Field) -> Option<&'a str> {
    resolve(message, field, |v| v.as_str().filter(|s| !s.is_empty()))
}

/// First numeric value of `field`. Numeric strings are accepted.
pub fn number(message: &Value, field: Field) -> Option<f64> {
    resolve(message, field, |v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// First object value of `field`.
pub fn object<'a>(message: &'a Value, field: Field) -> Option<&'a Map<String, Value>> {
    resolve(message, field, Value::as_object)
}

/// First present value of `field`, whatever its type.
pub fn raw<'a>(message: &'a Value, field: Field) -> Option<&'a Value> {
    resolve(message, field, |v| match v {
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    })
}
