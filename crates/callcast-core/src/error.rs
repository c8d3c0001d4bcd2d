// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for callcast.

use thiserror::Error;

/// The primary error type used across all callcast crates.
#[derive(Debug, Error)]
pub enum CallcastError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Calling provider errors (transport failure, non-2xx response, bad body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Contact list is structurally unusable (no data rows, unreadable CSV).
    #[error("contact list format error: {0}")]
    Format(String),

    /// Contact list has no header that names a phone number column.
    #[error("contact list has no phone number column (expected one of: {expected})")]
    MissingColumn { expected: String },

    /// A campaign, assistant, or phone number record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A registration or request field holds an unusable value.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Webhook payload is not an end-of-call report.
    #[error("unsupported webhook event: {}", event_type.as_deref().unwrap_or("<missing>"))]
    UnsupportedEvent { event_type: Option<String> },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CallcastError {
    /// Shorthand for a [`CallcastError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Wraps any error as a storage failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(source),
        }
    }
}
