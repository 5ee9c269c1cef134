// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock MuleSoft telemetry: API performance, error and uptime events.

use rand::Rng;
use serde_json::{json, Value};

use crate::util::{event_id, iso_timestamp, pick, random_ip, round2, round3, weighted};

struct ApiProfile {
    name: &'static str,
    endpoint: &'static str,
    version: &'static str,
}

const APIS: &[ApiProfile] = &[
    ApiProfile { name: "Customer API", endpoint: "/api/customers", version: "v2.1" },
    ApiProfile { name: "Order API", endpoint: "/api/orders", version: "v1.3" },
    ApiProfile { name: "Inventory API", endpoint: "/api/inventory", version: "v3.0" },
    ApiProfile { name: "Payment API", endpoint: "/api/payments", version: "v2.0" },
    ApiProfile { name: "Notification API", endpoint: "/api/notifications", version: "v1.5" },
];

const ENVIRONMENTS: &[&str] = &["DEV", "TEST", "STAGING", "PROD"];
const APPLICATIONS: &[&str] = &[
    "retail-customer-exp",
    "backend-integration",
    "payment-processor",
    "data-sync",
];

const ERROR_STATUS_CODES: &[u16] = &[400, 401, 403, 404, 429, 500, 502, 503, 504];
const ERROR_TYPES: &[&str] = &[
    "CONNECTIVITY",
    "TIMEOUT",
    "SECURITY",
    "ROUTING",
    "TRANSFORMATION",
    "POLICY_VIOLATION",
    "RATE_LIMIT_EXCEEDED",
];

const PERFORMANCE_STATUS_CODES: &[(u16, u32)] = &[(200, 80), (201, 15), (202, 5)];

pub fn performance_event() -> Value {
    let mut rng = rand::rng();
    let api = pick(&mut rng, APIS);
    let environment = *pick(&mut rng, ENVIRONMENTS);

    // PROD runs tighter latency than the lower environments
    let base_latency = rng.random_range(50..=200);
    let latency = if environment == "PROD" {
        base_latency + rng.random_range(0..=100)
    } else {
        base_latency + rng.random_range(0..=500)
    };

    json!({
        "eventType": "MuleSoft_Performance",
        "sourceSystem": "MuleSoft",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "apiName": api.name,
        "apiEndpoint": api.endpoint,
        "apiVersion": api.version,
        "environment": environment,
        "applicationName": *pick(&mut rng, APPLICATIONS),
        "responseTime": latency,
        "throughput": rng.random_range(10..=500), // requests per minute
        "memoryUsage": round2(rng.random_range(40.0..85.0)), // percentage
        "cpuUsage": round2(rng.random_range(15.0..75.0)), // percentage
        "statusCode": *weighted(&mut rng, PERFORMANCE_STATUS_CODES),
    })
}

pub fn error_event() -> Value {
    let mut rng = rand::rng();
    let api = pick(&mut rng, APIS);
    let status_code = *pick(&mut rng, ERROR_STATUS_CODES);

    json!({
        "eventType": "MuleSoft_Error",
        "sourceSystem": "MuleSoft",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "apiName": api.name,
        "apiEndpoint": api.endpoint,
        "apiVersion": api.version,
        "environment": *pick(&mut rng, ENVIRONMENTS),
        "applicationName": *pick(&mut rng, APPLICATIONS),
        "statusCode": status_code,
        "errorType": *pick(&mut rng, ERROR_TYPES),
        "errorMessage": format!("API error occurred: {status_code}"),
        "responseTime": rng.random_range(1000..=10000), // slower for errors
        "retryAttempts": rng.random_range(0..=3),
        "sourceIp": random_ip(&mut rng),
    })
}

pub fn uptime_event() -> Value {
    let mut rng = rand::rng();
    let api = pick(&mut rng, APIS);
    let environment = *pick(&mut rng, ENVIRONMENTS);

    let uptime = if environment == "PROD" {
        round3(rng.random_range(99.0..99.99))
    } else {
        round3(rng.random_range(95.0..99.5))
    };

    json!({
        "eventType": "MuleSoft_Uptime",
        "sourceSystem": "MuleSoft",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "apiName": api.name,
        "apiEndpoint": api.endpoint,
        "apiVersion": api.version,
        "environment": environment,
        "applicationName": *pick(&mut rng, APPLICATIONS),
        "availability": uptime,
        "uptime": uptime,
        "totalRequests": rng.random_range(1000..=50000),
        "successfulRequests": rng.random_range(950..=49500),
        "failedRequests": rng.random_range(0..=500),
        "avgResponseTime": rng.random_range(80..=300),
        "monitoringPeriod": "1h", // 1 hour monitoring window
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_ingestion::{classify, LogType};

    const REQUIRED_FIELDS: &[&str] = &["eventType", "sourceSystem", "timestamp", "eventId"];

    fn assert_required_fields(event: &Value) {
        for field in REQUIRED_FIELDS {
            assert!(event.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(event["sourceSystem"], "MuleSoft");
    }

    #[test]
    fn test_performance_event_schema() {
        for _ in 0..50 {
            let event = performance_event();
            assert_required_fields(&event);
            assert_eq!(event["eventType"], "MuleSoft_Performance");
            assert!([200, 201, 202].contains(&event["statusCode"].as_u64().unwrap()));
            let memory = event["memoryUsage"].as_f64().unwrap();
            assert!((40.0..85.0).contains(&memory));
            let latency = event["responseTime"].as_u64().unwrap();
            assert!((50..=700).contains(&latency));
        }
    }

    #[test]
    fn test_error_event_schema() {
        for _ in 0..50 {
            let event = error_event();
            assert_required_fields(&event);
            assert_eq!(event["eventType"], "MuleSoft_Error");
            let status = event["statusCode"].as_u64().unwrap() as u16;
            assert!(ERROR_STATUS_CODES.contains(&status));
            assert!(event["errorMessage"]
                .as_str()
                .unwrap()
                .starts_with("API error occurred:"));
        }
    }

    #[test]
    fn test_uptime_event_schema() {
        for _ in 0..50 {
            let event = uptime_event();
            assert_required_fields(&event);
            assert_eq!(event["eventType"], "MuleSoft_Uptime");
            let uptime = event["uptime"].as_f64().unwrap();
            assert!((95.0..100.0).contains(&uptime));
            assert_eq!(event["availability"], event["uptime"]);
        }
    }

    #[test]
    fn test_performance_events_route_to_performance_stream() {
        assert_eq!(classify(&performance_event()), LogType::MuleSoftPerformance);
    }

    #[test]
    fn test_uptime_events_route_to_uptime_stream() {
        assert_eq!(classify(&uptime_event()), LogType::MuleSoftUptime);
    }

    #[test]
    fn test_error_events_route_to_performance_stream() {
        // Error events carry a responseTime, and the performance rule is
        // checked before the error rule, so they land in the performance
        // stream. First-match ordering, preserved on purpose.
        assert_eq!(classify(&error_event()), LogType::MuleSoftPerformance);
    }
}
