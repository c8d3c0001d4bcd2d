// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact list loading.
//!
//! A contact list is comma-separated text whose first line holds the headers.
//! One header must name a phone number column; every other column becomes a
//! call-time variable.

use callcast_core::CallcastError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header fragments that mark the phone number column (case-insensitive
/// substring match).
pub const PHONE_HEADER_ALIASES: &[&str] =
    &["phone_number", "phone number", "Phone", "PHONE", "phoneNumber"];

/// Whether `header` names the phone number column.
pub fn is_phone_header(header: &str) -> bool {
    let header = header.to_lowercase();
    PHONE_HEADER_ALIASES
        .iter()
        .any(|alias| header.contains(&alias.to_lowercase()))
}

/// One data line, fields in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactRow {
    fields: Vec<(String, String)>,
}

impl ContactRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Builds a row from a JSON object. Non-string values are rendered as
    /// JSON text; `null` becomes an empty string.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of a column by exact header name.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first phone column, trimmed. `None` when the row has no
    /// phone column or the value is blank.
    pub fn phone_number(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| is_phone_header(key))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Every column except the phone column, as call-time variables.
    pub fn variables(&self) -> Map<String, Value> {
        let phone_column = self.fields.iter().position(|(key, _)| is_phone_header(key));
        self.fields
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != phone_column)
            .map(|(_, (key, value))| (key.clone(), Value::String(value.clone())))
            .collect()
    }
}

/// A parsed contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    pub headers: Vec<String>,
    pub rows: Vec<ContactRow>,
}

impl ContactList {
    /// Parses contact list text.
    ///
    /// Leading and trailing blank lines are ignored. Every line after the
    /// header yields exactly one row: a blank interior line becomes a row of
    /// empty values, which dispatch later drops for lack of a phone number.
    /// Newlines inside quoted fields stay within their row.
    ///
    /// Fails with [`CallcastError::Format`] when there is no data row and with
    /// [`CallcastError::MissingColumn`] when no header names a phone column.
    /// Short rows are padded with empty values; surplus values are dropped.
    /// Phone values are not validated here.
    pub fn parse(text: &str) -> Result<Self, CallcastError> {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true).trim(Trim::All);

        let lines = logical_lines(text.trim());
        let Some((header_line, data_lines)) = lines.split_first() else {
            return Err(CallcastError::Format("contact list is empty".into()));
        };

        let headers: Vec<String> = read_record(&builder, header_line)
            .map_err(|e| CallcastError::Format(format!("unreadable header row: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::with_capacity(data_lines.len());
        for (index, line) in data_lines.iter().enumerate() {
            let record = read_record(&builder, line).map_err(|e| {
                CallcastError::Format(format!("unreadable data row {}: {e}", index + 1))
            })?;
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), record.get(i).unwrap_or_default().to_string()))
                .collect();
            rows.push(ContactRow::new(fields));
        }

        if rows.is_empty() {
            return Err(CallcastError::Format(
                "contact list must have a header row and at least one data row".into(),
            ));
        }

        if !headers.iter().any(|h| is_phone_header(h)) {
            return Err(CallcastError::MissingColumn {
                expected: PHONE_HEADER_ALIASES.join(", "),
            });
        }

        Ok(Self { headers, rows })
    }

    /// Builds a contact list from JSON objects, one per contact.
    ///
    /// Headers are the union of object keys in first-seen order. The same
    /// row-count and phone-column checks as [`ContactList::parse`] apply.
    pub fn from_json_rows(objects: &[Map<String, Value>]) -> Result<Self, CallcastError> {
        if objects.is_empty() {
            return Err(CallcastError::Format(
                "contact list must have at least one contact".into(),
            ));
        }

        let mut headers: Vec<String> = Vec::new();
        for key in objects.iter().flat_map(|object| object.keys()) {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        if !headers.iter().any(|h| is_phone_header(h)) {
            return Err(CallcastError::MissingColumn {
                expected: PHONE_HEADER_ALIASES.join(", "),
            });
        }

        let rows = objects.iter().map(ContactRow::from_json).collect();
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Splits text into lines, keeping a newline that sits inside a quoted field
/// with its line. `""` escapes keep the quote parity even.
fn logical_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'"' => quoted = !quoted,
            b'\n' if !quoted => {
                lines.push(text[start..i].trim_end_matches('\r'));
                start = i + 1;
            }
            _ => {}
        }
    }
    lines.push(text[start..].trim_end_matches('\r'));
    lines
}

/// Reads one line as a CSV record. A blank line is an empty record.
fn read_record(builder: &ReaderBuilder, line: &str) -> Result<StringRecord, csv::Error> {
    builder
        .from_reader(line.as_bytes())
        .records()
        .next()
        .unwrap_or_else(|| Ok(StringRecord::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_rows_in_header_order() {
        let list = ContactList::parse(
            "name, Phone Number ,company\nAda,+15551230001,Acme\nGrace, +15551230002 ,Navy\n",
        )
        .unwrap();

        assert_eq!(list.headers, vec!["name", "Phone Number", "company"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.rows[1].phone_number(), Some("+15551230002"));
        assert_eq!(list.rows[0].get("company"), Some("Acme"));

        let vars = list.rows[0].variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["name"], Value::String("Ada".into()));
        assert!(!vars.contains_key("Phone Number"));
    }

    #[test]
    fn phone_alias_match_is_case_insensitive_substring() {
        for header in ["phone_number", "PHONE", "mobilePhone", "Customer phone number", "phoneNumber"] {
            assert!(is_phone_header(header), "{header}");
        }
        for header in ["number", "name", "mobile", "tel"] {
            assert!(!is_phone_header(header), "{header}");
        }
    }

    #[test]
    fn header_only_is_format_error() {
        let err = ContactList::parse("name,phone_number\n").unwrap_err();
        assert!(matches!(err, CallcastError::Format(_)), "got {err:?}");

        let err = ContactList::parse("").unwrap_err();
        assert!(matches!(err, CallcastError::Format(_)), "got {err:?}");
    }

    #[test]
    fn missing_phone_column_is_rejected() {
        let err = ContactList::parse("name,email\nAda,ada@example.com\n").unwrap_err();
        assert!(matches!(err, CallcastError::MissingColumn { .. }), "got {err:?}");
    }

    #[test]
    fn short_rows_are_padded_and_blank_phone_is_none() {
        let list = ContactList::parse("phone_number,name\n,Ada\n+15550001111\n").unwrap();
        assert_eq!(list.rows[0].phone_number(), None);
        assert_eq!(list.rows[1].get("name"), Some(""));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let list = ContactList::parse("phone,company\n\"+15550001111\",\"Acme, Inc\"\n").unwrap();
        assert_eq!(list.rows[0].phone_number(), Some("+15550001111"));
        assert_eq!(list.rows[0].get("company"), Some("Acme, Inc"));
    }

    #[test]
    fn blank_interior_line_becomes_empty_row() {
        let list =
            ContactList::parse("phone_number,name\n+15550000001,Ada\n\n+15550000002,Grace").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.rows[1].phone_number(), None);
        assert_eq!(list.rows[1].get("name"), Some(""));
        assert_eq!(list.rows[2].phone_number(), Some("+15550000002"));
    }

    #[test]
    fn quoted_newline_stays_in_its_row() {
        let list =
            ContactList::parse("phone,note\r\n+15550001111,\"line one\nline two\"\r\n+15550002222,x\r\n")
                .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.rows[0].get("note"), Some("line one\nline two"));
        assert_eq!(list.rows[1].phone_number(), Some("+15550002222"));
    }

    #[test]
    fn json_rows_stringify_values() {
        let object = serde_json::json!({"phone_number": "+15550001111", "age": 42, "note": null});
        let row = ContactRow::from_json(object.as_object().unwrap());
        assert_eq!(row.phone_number(), Some("+15550001111"));
        let vars = row.variables();
        assert_eq!(vars["age"], Value::String("42".into()));
        assert_eq!(vars["note"], Value::String(String::new()));
    }

    #[test]
    fn json_rows_share_loader_checks() {
        let objects: Vec<Map<String, Value>> = serde_json::from_str(
            r#"[{"name": "Ada", "phoneNumber": "+15550000001"}, {"name": "Grace", "team": "Navy"}]"#,
        )
        .unwrap();
        let list = ContactList::from_json_rows(&objects).unwrap();
        assert_eq!(list.headers, vec!["name", "phoneNumber", "team"]);
        assert_eq!(list.rows[0].phone_number(), Some("+15550000001"));
        assert_eq!(list.rows[1].phone_number(), None);

        let err = ContactList::from_json_rows(&[]).unwrap_err();
        assert!(matches!(err, CallcastError::Format(_)), "got {err:?}");

        let objects: Vec<Map<String, Value>> =
            serde_json::from_str(r#"[{"name": "Ada"}]"#).unwrap();
        let err = ContactList::from_json_rows(&objects).unwrap_err();
        assert!(matches!(err, CallcastError::MissingColumn { .. }), "got {err:?}");
    }

    fn plain_header() -> impl Strategy<Value = String> {
        "[a-z]{1,10}".prop_filter("must not name a phone column", |h| !is_phone_header(h))
    }

    proptest! {
        #[test]
        fn yields_one_row_per_data_line(
            others in proptest::collection::vec(plain_header(), 0..4),
            values in proptest::collection::vec("[A-Za-z0-9+]{1,12}", 1..40),
        ) {
            let mut headers = vec!["phone_number".to_string()];
            headers.extend(others);
            let mut text = headers.join(",");
            for value in &values {
                text.push('\n');
                text.push_str(&vec![value.as_str(); headers.len()].join(","));
            }

            let list = ContactList::parse(&text).unwrap();
            prop_assert_eq!(list.len(), text.lines().count() - 1);
        }

        #[test]
        fn blank_lines_become_rows_without_phone(
            lines in proptest::collection::vec(
                prop_oneof![Just(None::<String>), "[0-9]{4,10}".prop_map(|digits| Some(format!("+1{digits}")))],
                0..30,
            ),
            last in "[0-9]{4,10}",
        ) {
            let mut text = String::from("phone_number,name");
            let mut lines = lines;
            lines.push(Some(format!("+1{last}")));
            for line in &lines {
                text.push('\n');
                if let Some(phone) = line {
                    text.push_str(phone);
                    text.push_str(",x");
                }
            }

            let list = ContactList::parse(&text).unwrap();
            prop_assert_eq!(list.len(), text.split('\n').count() - 1);
            let blanks = lines.iter().filter(|line| line.is_none()).count();
            let without_phone = list.rows.iter().filter(|row| row.phone_number().is_none()).count();
            prop_assert_eq!(without_phone, blanks);
        }

        #[test]
        fn lists_without_phone_header_fail(
            headers in proptest::collection::vec(plain_header(), 1..5),
            rows in 1usize..10,
        ) {
            let mut text = headers.join(",");
            for _ in 0..rows {
                text.push('\n');
                text.push_str(&vec!["x"; headers.len()].join(","));
            }
            let is_missing_column = matches!(
                ContactList::parse(&text),
                Err(CallcastError::MissingColumn { .. })
            );
            prop_assert!(is_missing_column);
        }
    }
}
