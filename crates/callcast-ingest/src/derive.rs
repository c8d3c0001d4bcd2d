// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values computed from report fields rather than copied from them.

use callcast_core::types::{CallDirection, Sentiment};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;

/// Provider call type marking a call the tenant placed.
pub const OUTBOUND_CALL_TYPE: &str = "outboundPhoneCall";

/// Default billing rate per call second.
pub const DEFAULT_COST_PER_SECOND: f64 = 0.011;

/// Sentiment from a success evaluation.
///
/// Accepts booleans, `"true"`/`"false"`/`"pass"`/`"fail"` strings, and scores
/// on a 1-10 scale (7 and up positive, 4 and below negative). Anything else,
/// including no evaluation, is neutral.
pub fn sentiment(evaluation: Option<&Value>) -> Sentiment {
    match evaluation {
        Some(Value::Bool(true)) => Sentiment::Positive,
        Some(Value::Bool(false)) => Sentiment::Negative,
        Some(Value::String(s)) => match s.as_str() {
            "true" | "pass" => Sentiment::Positive,
            "false" | "fail" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(score) if score >= 7.0 => Sentiment::Positive,
            Some(score) if score <= 4.0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        },
        _ => Sentiment::Neutral,
    }
}

/// Provider-reported cost when present, otherwise duration times rate.
pub fn cost(reported: Option<f64>, duration_minutes: f64, cost_per_second: f64) -> f64 {
    reported.unwrap_or(duration_minutes * 60.0 * cost_per_second)
}

/// Outbound when any candidate call type is the outbound marker.
pub fn direction<'a>(call_types: impl IntoIterator<Item = &'a str>) -> CallDirection {
    if call_types.into_iter().any(|t| t == OUTBOUND_CALL_TYPE) {
        CallDirection::Outbound
    } else {
        CallDirection::Inbound
    }
}

/// Rewrites an RFC 3339 timestamp (or a bare `YYYY-MM-DD` date, read as UTC
/// midnight) in the stored form: UTC, millisecond precision, `Z` suffix.
///
/// Stored timestamps compare correctly as text only in this form.
pub fn utc_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let instant = match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => instant.with_timezone(&Utc),
        Err(_) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc(),
    };
    Some(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}
