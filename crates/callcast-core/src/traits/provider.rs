// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calling provider trait.

use async_trait::async_trait;

use crate::error::CallcastError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CallRequest, PlacedCall};

/// Adapter for the external calling provider.
#[async_trait]
pub trait CallProvider: PluginAdapter {
    /// Asks the provider to place one outbound call.
    ///
    /// Returns the provider call id on a 2xx response. Transport errors,
    /// non-2xx statuses, and bodies without an id are all
    /// [`CallcastError::Provider`]. Implementations must not retry.
    async fn create_call(&self, request: &CallRequest) -> Result<PlacedCall, CallcastError>;
}
