// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use http_body_util::BodyExt;
use hyper::{body::Incoming, http, Request, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use log_ingestion::{classify, Config, IngestError, LogAnalyticsClient, LogType};

use crate::http_utils::{
    log_and_create_http_response, verify_request_content_length, HttpResponse,
};

/// The three inbound log-handler endpoints. They differ only in which default
/// fields they stamp and whether they classify or force the log type.
#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    /// Legacy Salesforce endpoint; always forwards as `SalesforceEvent`
    Salesforce,
    Mulesoft,
    Universal,
}

impl Endpoint {
    fn name(&self) -> &'static str {
        match self {
            Endpoint::Salesforce => "salesforceLogHandler",
            Endpoint::Mulesoft => "mulesoftLogHandler",
            Endpoint::Universal => "universalLogHandler",
        }
    }

    /// `sourceSystem` stamped on records that arrive without one. The
    /// universal endpoint leaves the field alone.
    fn default_source(&self) -> Option<&'static str> {
        match self {
            Endpoint::Salesforce => Some("Salesforce"),
            Endpoint::Mulesoft => Some("MuleSoft"),
            Endpoint::Universal => None,
        }
    }

    fn success_message(&self, log_type: LogType, downstream: &str) -> String {
        match self {
            Endpoint::Salesforce => {
                format!("Salesforce event logged successfully: {downstream}")
            }
            Endpoint::Mulesoft => {
                format!("MuleSoft event logged successfully to {log_type}: {downstream}")
            }
            Endpoint::Universal => {
                format!("Event logged successfully to {log_type}: {downstream}")
            }
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            Endpoint::Salesforce => "Failed to log Salesforce event",
            Endpoint::Mulesoft => "Failed to log MuleSoft event",
            Endpoint::Universal => "Failed to log event",
        }
    }
}

/// Handles one inbound record: validate, stamp defaults, classify, forward.
///
/// A missing intake client (unset credentials) fails this request with a
/// 500-class response but never takes the process down.
pub async fn handle_event(
    config: Arc<Config>,
    intake: Option<Arc<LogAnalyticsClient>>,
    req: Request<Incoming>,
    endpoint: Endpoint,
) -> http::Result<HttpResponse> {
    debug!("{} invoked", endpoint.name());

    let (parts, body) = req.into_parts();
    if let Some(response) = verify_request_content_length(
        &parts.headers,
        config.max_request_content_length,
        "Error processing event",
    ) {
        return response;
    }

    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            return log_and_create_http_response(
                &format!("Error reading event body: {e}"),
                StatusCode::BAD_REQUEST,
            );
        }
    };

    let mut payload = match parse_payload(&body_bytes) {
        Some(payload) => payload,
        None => {
            return log_and_create_http_response(
                "Empty or invalid JSON payload",
                StatusCode::BAD_REQUEST,
            );
        }
    };

    stamp_defaults(&mut payload, endpoint.default_source());
    let event = Value::Object(payload);

    let log_type = match endpoint {
        Endpoint::Salesforce => LogType::SalesforceEvent,
        Endpoint::Mulesoft | Endpoint::Universal => classify(&event),
    };

    let result = match intake {
        Some(intake) => intake.post_event(&event, log_type).await,
        None => Err(IngestError::MissingCredentials),
    };

    match result {
        Ok((200, downstream)) => log_and_create_http_response(
            &endpoint.success_message(log_type, &downstream),
            StatusCode::OK,
        ),
        Ok((status, downstream)) => log_and_create_http_response(
            &format!("{}: {downstream}", endpoint.failure_prefix()),
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        ),
        Err(e) => log_and_create_http_response(
            &format!("{}: {e}", endpoint.failure_prefix()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    }
}

/// Accepts only a non-empty JSON object; everything else is treated as an
/// empty payload.
fn parse_payload(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

fn stamp_defaults(payload: &mut Map<String, Value>, default_source: Option<&'static str>) {
    if !payload.contains_key("timestamp") {
        payload.insert(
            "timestamp".to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
    }
    if let Some(source) = default_source {
        if !payload.contains_key("sourceSystem") {
            payload.insert("sourceSystem".to_string(), Value::from(source));
        }
    }
}
