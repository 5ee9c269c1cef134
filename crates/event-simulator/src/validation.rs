// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Deployment validation: probes the forwarder endpoints with test events
//! and checks that a mixed batch flows through end to end.

use serde_json::{json, Value};
use tracing::{error, info};

use crate::sender::{EventSender, MULESOFT_HANDLER, SALESFORCE_HANDLER, UNIVERSAL_HANDLER};
use crate::util::{event_id, iso_timestamp};
use crate::{mulesoft, salesforce};

pub const PROBED_ENDPOINTS: &[&str] =
    &[SALESFORCE_HANDLER, MULESOFT_HANDLER, UNIVERSAL_HANDLER];

/// A mixed data-flow batch is considered healthy when at least this share of
/// its events is delivered.
pub const DATA_FLOW_PASS_THRESHOLD: f64 = 80.0;

#[derive(Debug)]
pub struct ProbeResult {
    pub endpoint: &'static str,
    /// Forwarder status, or `None` when the request never completed
    pub status: Option<u16>,
    pub detail: String,
}

impl ProbeResult {
    pub fn passed(&self) -> bool {
        self.status == Some(200)
    }
}

pub fn validation_event() -> Value {
    json!({
        "eventType": "ValidationTest",
        "sourceSystem": "Salesforce",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "userId": "test-user",
        "action": "validation",
    })
}

/// Posts a validation event to each handler endpoint and reports the outcome
/// per endpoint.
pub async fn probe_endpoints(sender: &EventSender) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(PROBED_ENDPOINTS.len());
    for &endpoint in PROBED_ENDPOINTS {
        let result = match sender.post(&validation_event(), endpoint).await {
            Ok((status, text)) => ProbeResult {
                endpoint,
                status: Some(status),
                detail: text,
            },
            Err(e) => ProbeResult {
                endpoint,
                status: None,
                detail: e.to_string(),
            },
        };
        if result.passed() {
            info!("{}: SUCCESS (Status: 200)", result.endpoint);
        } else {
            error!(
                "{}: FAILED (Status: {:?}) {}",
                result.endpoint, result.status, result.detail
            );
        }
        results.push(result);
    }
    results
}

/// Sends one event of each flavor to its natural endpoint and returns
/// `(delivered, total)`.
pub async fn data_flow_check(sender: &EventSender) -> (usize, usize) {
    let batch: Vec<(Value, &str)> = vec![
        (salesforce::login_event(), SALESFORCE_HANDLER),
        (salesforce::api_usage_event(), SALESFORCE_HANDLER),
        (mulesoft::performance_event(), MULESOFT_HANDLER),
        (mulesoft::error_event(), MULESOFT_HANDLER),
        (mulesoft::uptime_event(), UNIVERSAL_HANDLER),
    ];
    let total = batch.len();

    let mut delivered = 0;
    for (event, endpoint) in &batch {
        if sender.send(event, endpoint).await {
            delivered += 1;
        }
    }

    let rate = delivered as f64 / total as f64 * 100.0;
    if rate >= DATA_FLOW_PASS_THRESHOLD {
        info!("Data flow: PASS ({delivered}/{total} delivered)");
    } else {
        error!("Data flow: FAIL ({delivered}/{total} delivered)");
    }
    (delivered, total)
}
