// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for callcast integration tests.
//!
//! Provides in-memory adapters for fast, deterministic tests without a
//! database or the external calling provider.
//!
//! # Components
//!
//! - [`MemoryStore`] - in-memory campaign, call record, and tenant store
//! - [`MockCallProvider`] - scripted calling provider that records every request
//! - [`fixtures`] - a seeded tenant, assistant, phone number, and campaign

pub mod fixtures;
pub mod memory_store;
pub mod mock_provider;

pub use memory_store::MemoryStore;
pub use mock_provider::{MockCallProvider, RecordedCall};
