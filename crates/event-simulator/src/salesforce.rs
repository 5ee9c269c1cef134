// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock Salesforce telemetry: login, API usage and data modification events.

use rand::Rng;
use serde_json::{json, Value};

use crate::util::{event_id, iso_timestamp, pick, random_ip, weighted};

const USERS: &[&str] = &[
    "john.doe@company.com",
    "jane.smith@company.com",
    "admin@company.com",
    "sales.rep@company.com",
    "manager@company.com",
    "developer@company.com",
];

const API_ENDPOINTS: &[&str] = &[
    "/services/data/v58.0/sobjects/Account/",
    "/services/data/v58.0/sobjects/Contact/",
    "/services/data/v58.0/sobjects/Opportunity/",
    "/services/data/v58.0/query/",
    "/services/apexrest/CustomAPI/",
];

const COUNTRIES: &[&str] = &["US", "UK", "DE", "FR", "CA", "AU", "JP"];
const BROWSERS: &[&str] = &["Chrome", "Firefox", "Safari", "Edge"];
const PLATFORMS: &[&str] = &["Windows", "Mac", "Linux", "Mobile"];
const LOGIN_TYPES: &[&str] = &["Application", "SAML SSO", "OAuth"];
const FAILURE_REASONS: &[&str] = &[
    "Invalid password",
    "Account locked",
    "MFA required",
    "IP restriction",
];
const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];
const CLIENT_APPLICATIONS: &[&str] =
    &["Salesforce Mobile", "Data Loader", "Custom App", "Integration"];
const SOBJECT_TYPES: &[&str] = &["Account", "Contact", "Opportunity", "Lead", "Case"];
const ACTIONS: &[&str] = &["Create", "Update", "Delete", "View"];

/// Weighted mix mirroring real org traffic: mostly 2xx with a long tail of
/// auth and server errors.
const API_STATUS_CODES: &[(u16, u32)] = &[
    (200, 60),
    (201, 15),
    (400, 10),
    (401, 5),
    (403, 3),
    (404, 4),
    (500, 3),
];

pub fn login_event() -> Value {
    let mut rng = rand::rng();
    let user = *pick(&mut rng, USERS);
    // 75% success rate
    let success = rng.random_bool(0.75);
    let session_id = if success {
        Value::from(&event_id()[..8])
    } else {
        Value::Null
    };
    let failure_reason = if success {
        Value::Null
    } else {
        Value::from(*pick(&mut rng, FAILURE_REASONS))
    };

    json!({
        "eventType": "Login",
        "sourceSystem": "Salesforce",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "userId": user,
        "username": user,
        "loginType": *pick(&mut rng, LOGIN_TYPES),
        "sourceIp": random_ip(&mut rng),
        "country": *pick(&mut rng, COUNTRIES),
        "browser": *pick(&mut rng, BROWSERS),
        "platform": *pick(&mut rng, PLATFORMS),
        "success": success,
        "sessionId": session_id,
        "failureReason": failure_reason,
    })
}

pub fn api_usage_event() -> Value {
    let mut rng = rand::rng();
    let method = *pick(&mut rng, HTTP_METHODS);
    let records_processed = if method == "GET" {
        rng.random_range(1..=1000)
    } else {
        rng.random_range(1..=100)
    };

    json!({
        "eventType": "API_Usage",
        "sourceSystem": "Salesforce",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "userId": *pick(&mut rng, USERS),
        "apiEndpoint": *pick(&mut rng, API_ENDPOINTS),
        "httpMethod": method,
        "statusCode": *weighted(&mut rng, API_STATUS_CODES),
        "responseTime": rng.random_range(50..=2000), // milliseconds
        "recordsProcessed": records_processed,
        "apiVersion": "v58.0",
        "clientApplication": *pick(&mut rng, CLIENT_APPLICATIONS),
        "sourceIp": random_ip(&mut rng),
    })
}

pub fn data_modification_event() -> Value {
    let mut rng = rand::rng();
    let old_values = if rng.random_bool(0.5) {
        json!({"Status": "New", "Amount": 1000})
    } else {
        json!({})
    };
    let new_values = if rng.random_bool(0.5) {
        json!({"Status": "Qualified", "Amount": 1500})
    } else {
        json!({})
    };

    json!({
        "eventType": "Data_Modification",
        "sourceSystem": "Salesforce",
        "timestamp": iso_timestamp(),
        "eventId": event_id(),
        "userId": *pick(&mut rng, USERS),
        "sobjectType": *pick(&mut rng, SOBJECT_TYPES),
        "action": *pick(&mut rng, ACTIONS),
        "recordId": record_id(&mut rng),
        "fieldsModified": rng.random_range(1..=10),
        "oldValues": old_values,
        "newValues": new_values,
    })
}

/// 15-character uppercase-hex record id, the shape of a Salesforce record key
fn record_id(rng: &mut rand::rngs::ThreadRng) -> String {
    const HEX: &[u8] = b"0123456789ABCDEF";
    (0..15)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}
