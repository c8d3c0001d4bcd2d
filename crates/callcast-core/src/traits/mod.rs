// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every adapter extends [`PluginAdapter`] and uses `#[async_trait]` so the
//! engine can hold them as trait objects.

pub mod adapter;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use provider::CallProvider;
pub use storage::{CallRecordStore, CampaignStore, TenantDirectory};
