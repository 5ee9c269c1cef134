// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

/// Route names of the forwarder's log-handler endpoints, lowercase as they
/// appear in the deployed function URLs.
pub const SALESFORCE_HANDLER: &str = "salesforceloghandler";
pub const MULESOFT_HANDLER: &str = "mulesoftloghandler";
pub const UNIVERSAL_HANDLER: &str = "universalloghandler";

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts generated events to a running forwarder.
pub struct EventSender {
    base_url: String,
    client: reqwest::Client,
}

impl EventSender {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                error!("Unable to build sender http client: {e}, using defaults");
                reqwest::Client::new()
            });
        EventSender {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint.to_lowercase())
    }

    /// Posts one event, returning the forwarder's status code and body.
    pub async fn post(&self, event: &Value, endpoint: &str) -> Result<(u16, String), reqwest::Error> {
        let response = self
            .client
            .post(self.endpoint_url(endpoint))
            .json(event)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        Ok((status, text))
    }

    /// Posts one event and reduces the outcome to delivered-or-not, logging
    /// either way.
    pub async fn send(&self, event: &Value, endpoint: &str) -> bool {
        match self.post(event, endpoint).await {
            Ok((200, _)) => {
                debug!("Sent {} event to {endpoint}", event_type(event));
                true
            }
            Ok((status, text)) => {
                error!("Failed to send event: {status} - {text}");
                false
            }
            Err(e) => {
                error!("Error sending event: {e}");
                false
            }
        }
    }
}

fn event_type(event: &Value) -> &str {
    event
        .get("eventType")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}
