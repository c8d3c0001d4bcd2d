// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion for callcast.
//!
//! Normalizes provider end-of-call reports into [`CallRecord`]s, attributes
//! each call to a tenant, and derives sentiment and cost.
//!
//! [`CallRecord`]: callcast_core::types::CallRecord

pub mod derive;
pub mod fields;
pub mod normalizer;
pub mod tenant;

pub use normalizer::{CallEvent, CallEventNormalizer, END_OF_CALL_REPORT};
pub use tenant::{TenantResolver, TenantSource};
