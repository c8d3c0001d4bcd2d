// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model re-exports and column conversion helpers.
//!
//! The canonical types live in `callcast-core::types`; this module adds the
//! text-column codecs the query modules share.

use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::Type;
use serde_json::{Map, Value};

pub use callcast_core::types::{
    Assistant, CallRecord, Campaign, CampaignJob, CampaignProgress, PhoneNumber, Tenant,
};

/// Read a text column and parse it with `FromStr` (status and enum columns).
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a JSON-object text column.
pub(crate) fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Map<String, Value>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Encode a JSON object for a text column.
pub(crate) fn json_text(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}
