// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde_json::Value;

/// Destination log stream for an event record. The Log Analytics workspace
/// materializes each variant as a `<name>_CL` custom log table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogType {
    SalesforceEvent,
    MuleSoftPerformance,
    MuleSoftError,
    MuleSoftUptime,
    MuleSoftGeneral,
    GeneralEvent,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::SalesforceEvent => "SalesforceEvent",
            LogType::MuleSoftPerformance => "MuleSoftPerformance",
            LogType::MuleSoftError => "MuleSoftError",
            LogType::MuleSoftUptime => "MuleSoftUptime",
            LogType::MuleSoftGeneral => "MuleSoftGeneral",
            LogType::GeneralEvent => "GeneralEvent",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns an event record to its destination log stream.
///
/// Pure and total: classification depends only on the record's fields, and
/// absent or malformed fields (a non-string `eventType`, a non-numeric
/// `statusCode`, a record that is not an object) fall through to the next
/// branch rather than failing.
///
/// First match wins. The field sets of the MuleSoft sub-rules overlap, so the
/// ordering is load-bearing: a record carrying both `responseTime` and
/// `statusCode >= 400` lands in `MuleSoftPerformance`.
pub fn classify(event: &Value) -> LogType {
    let event_type = str_field(event, "eventType").unwrap_or("");
    let source_system = str_field(event, "sourceSystem")
        .unwrap_or("")
        .to_ascii_lowercase();

    if source_system == "mulesoft" || event_type.starts_with("MuleSoft") {
        if has_field(event, "latency") || has_field(event, "responseTime") {
            LogType::MuleSoftPerformance
        } else if has_field(event, "error") || status_code(event) >= 400.0 {
            LogType::MuleSoftError
        } else if has_field(event, "uptime") || has_field(event, "availability") {
            LogType::MuleSoftUptime
        } else {
            LogType::MuleSoftGeneral
        }
    } else if source_system.contains("salesforce")
        || matches!(event_type, "Login" | "API_Usage" | "Data_Modification")
    {
        LogType::SalesforceEvent
    } else {
        LogType::GeneralEvent
    }
}

fn str_field<'a>(event: &'a Value, key: &str) -> Option<&'a str> {
    event.get(key).and_then(Value::as_str)
}

fn has_field(event: &Value, key: &str) -> bool {
    event.get(key).is_some()
}

fn status_code(event: &Value) -> f64 {
    event.get("statusCode").and_then(Value::as_f64).unwrap_or(0.0)
}
