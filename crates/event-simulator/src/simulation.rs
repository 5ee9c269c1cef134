// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;

use rand::Rng;
use serde_json::Value;
use tracing::info;

use crate::sender::{EventSender, MULESOFT_HANDLER, SALESFORCE_HANDLER};
use crate::util::weighted;
use crate::{mulesoft, salesforce};

#[derive(Debug)]
pub struct SimulationConfig {
    pub base_url: String,
    pub duration: Duration,
    pub events_per_minute: u32,
}

#[derive(Debug, Default)]
pub struct SimulationReport {
    pub total_events: u32,
    pub successful: u32,
    pub salesforce_events: u32,
    pub mulesoft_events: u32,
}

impl SimulationReport {
    pub fn failed(&self) -> u32 {
        self.total_events - self.successful
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_events == 0 {
            return 0.0;
        }
        f64::from(self.successful) / f64::from(self.total_events) * 100.0
    }
}

type Generator = fn() -> Value;

/// Salesforce traffic skews towards API usage; MuleSoft towards performance
/// samples. Mirrors the event mix the dashboards were tuned against.
const SALESFORCE_GENERATORS: &[(Generator, u32)] = &[
    (salesforce::login_event, 20),
    (salesforce::api_usage_event, 60),
    (salesforce::data_modification_event, 20),
];
const MULESOFT_GENERATORS: &[(Generator, u32)] = &[
    (mulesoft::performance_event, 60),
    (mulesoft::error_event, 25),
    (mulesoft::uptime_event, 15),
];

/// Picks the next event: 40% Salesforce, 60% MuleSoft, each routed to its
/// dedicated handler endpoint.
fn next_event() -> (Value, &'static str, bool) {
    let mut rng = rand::rng();
    if rng.random_bool(0.4) {
        let generator = weighted(&mut rng, SALESFORCE_GENERATORS);
        (generator(), SALESFORCE_HANDLER, true)
    } else {
        let generator = weighted(&mut rng, MULESOFT_GENERATORS);
        (generator(), MULESOFT_HANDLER, false)
    }
}

/// Runs a timed simulation against a deployed forwarder, pacing events at the
/// configured rate and tallying delivery results.
pub async fn run(config: &SimulationConfig) -> SimulationReport {
    info!(
        "Starting event simulation: {} events/minute for {}s against {}",
        config.events_per_minute,
        config.duration.as_secs(),
        config.base_url
    );

    let sender = EventSender::new(&config.base_url);
    let mut report = SimulationReport::default();
    let pause = Duration::from_secs_f64(60.0 / f64::from(config.events_per_minute.max(1)));
    let deadline = tokio::time::Instant::now() + config.duration;

    while tokio::time::Instant::now() < deadline {
        let (event, endpoint, is_salesforce) = next_event();
        if is_salesforce {
            report.salesforce_events += 1;
        } else {
            report.mulesoft_events += 1;
        }
        if sender.send(&event, endpoint).await {
            report.successful += 1;
        }
        report.total_events += 1;

        tokio::time::sleep(pause).await;
    }

    info!(
        "Simulation complete: {} events ({} Salesforce, {} MuleSoft), {} delivered, {} failed ({:.1}% success)",
        report.total_events,
        report.salesforce_events,
        report.mulesoft_events,
        report.successful,
        report.failed(),
        report.success_rate()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_event_routes_by_source() {
        for _ in 0..50 {
            let (event, endpoint, is_salesforce) = next_event();
            let source = event["sourceSystem"].as_str().unwrap();
            if is_salesforce {
                assert_eq!(source, "Salesforce");
                assert_eq!(endpoint, SALESFORCE_HANDLER);
            } else {
                assert_eq!(source, "MuleSoft");
                assert_eq!(endpoint, MULESOFT_HANDLER);
            }
        }
    }

    #[test]
    fn test_report_success_rate() {
        let report = SimulationReport {
            total_events: 8,
            successful: 6,
            salesforce_events: 3,
            mulesoft_events: 5,
        };
        assert_eq!(report.failed(), 2);
        assert_eq!(report.success_rate(), 75.0);

        assert_eq!(SimulationReport::default().success_rate(), 0.0);
    }
}
