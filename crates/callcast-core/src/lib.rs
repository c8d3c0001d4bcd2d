// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for callcast.
//!
//! Holds the shared error type, the campaign and call-record domain types,
//! and the adapter traits that storage backends and calling providers
//! implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CallcastError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{CallProvider, CallRecordStore, CampaignStore, PluginAdapter, TenantDirectory};
