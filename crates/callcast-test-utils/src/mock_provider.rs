// SPDX-FileCopyrightText: 2026 Callcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock calling provider for deterministic dispatch tests.
//!
//! `MockCallProvider` implements `CallProvider`, records every request with
//! the (possibly paused) tokio clock time it arrived, and rejects numbers that
//! were configured to fail.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use callcast_core::CallcastError;
use callcast_core::traits::{CallProvider, PluginAdapter};
use callcast_core::types::{AdapterType, CallRequest, HealthStatus, PlacedCall};

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: CallRequest,
    pub at: Instant,
}

/// A scripted calling provider.
///
/// Successful calls get sequential ids `call_1`, `call_2`, ... in arrival order.
pub struct MockCallProvider {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failing: HashSet<String>,
    latency: Duration,
    issued: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockCallProvider {
    /// A provider that accepts every call immediately.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: HashSet::new(),
            latency: Duration::ZERO,
            issued: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Reject calls to these destination numbers.
    pub fn failing_numbers<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing = numbers.into_iter().map(Into::into).collect();
        self
    }

    /// Hold every call open for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every request received so far, in arrival order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Highest number of calls that were open at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockCallProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCallProvider {
    fn name(&self) -> &str {
        "mock-call-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::CallProvider
    }

    async fn health_check(&self) -> Result<HealthStatus, CallcastError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CallcastError> {
        Ok(())
    }
}

#[async_trait]
impl CallProvider for MockCallProvider {
    async fn create_call(&self, request: &CallRequest) -> Result<PlacedCall, CallcastError> {
        self.calls.lock().await.push(RecordedCall {
            request: request.clone(),
            at: Instant::now(),
        });

        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&request.customer_number) {
            tracing::debug!(number = %request.customer_number, "mock provider rejecting call");
            return Err(CallcastError::Provider {
                message: format!("API returned 400 Bad Request: rejected {}", request.customer_number),
                source: None,
            });
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PlacedCall {
            call_id: format!("call_{n}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn request(number: &str) -> CallRequest {
        CallRequest {
            assistant_id: "asst_1".into(),
            phone_number_id: "pn_1".into(),
            customer_number: number.into(),
            variables: Map::new(),
        }
    }

    #[tokio::test]
    async fn records_calls_and_rejects_failing_numbers() {
        let provider = MockCallProvider::new().failing_numbers(["+15550000002"]);

        let ok = provider.create_call(&request("+15550000001")).await.unwrap();
        assert_eq!(ok.call_id, "call_1");
        assert!(provider.create_call(&request("+15550000002")).await.is_err());

        let calls = provider.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].request.customer_number, "+15550000002");
    }
}
