// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the Azure Log Analytics HTTP Data Collector API.
//!
//! Every request is authenticated with a per-request signature: an
//! HMAC-SHA256 over a canonical string derived from the body length, content
//! type and request timestamp, keyed with the workspace shared key. The
//! signature recipe is byte-for-byte fixed by the collector API; changing any
//! input line invalidates the request.

use core::time::Duration;
use std::error::Error;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, error};

use crate::classify::LogType;
use crate::config::Config;
use crate::error::IngestError;

/// Host suffix of the collection endpoint; prefixed with the workspace id.
pub const COLLECTION_HOST: &str = "ods.opinsights.azure.com";
pub const RESOURCE_PATH: &str = "/api/logs";
pub const API_VERSION: &str = "2016-04-01";

const CONTENT_TYPE_JSON: &str = "application/json";
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

type HmacSha256 = Hmac<Sha256>;

/// An ephemeral signed request. Lives for a single outbound call and is
/// never persisted.
#[derive(Debug)]
pub struct SignedRequest {
    pub url: String,
    pub body: String,
    pub headers: HeaderMap,
}

#[derive(Debug)]
pub struct LogAnalyticsClient {
    workspace_id: String,
    /// Decoded shared key bytes. Decoded once at construction so a garbage
    /// key surfaces as a configuration error, not a bad signature.
    key: Vec<u8>,
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl LogAnalyticsClient {
    /// Builds a client from the process configuration. Refuses to construct
    /// when the workspace id or shared key is absent or undecodable, so no
    /// request is ever signed with empty or garbage key material.
    pub fn from_config(config: &Config) -> Result<Self, IngestError> {
        let workspace_id = config
            .workspace_id
            .clone()
            .ok_or(IngestError::MissingCredentials)?;
        let shared_key = config
            .shared_key
            .as_deref()
            .ok_or(IngestError::MissingCredentials)?;
        let key = BASE64.decode(shared_key)?;
        if key.is_empty() {
            return Err(IngestError::MissingCredentials);
        }

        let url = config.url_override.clone().unwrap_or_else(|| {
            format!("https://{workspace_id}.{COLLECTION_HOST}{RESOURCE_PATH}?api-version={API_VERSION}")
        });

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = build_client(config.proxy_url.as_deref(), timeout).unwrap_or_else(|e| {
            error!("Unable to build ingestion http client: {e}, using defaults");
            reqwest::Client::new()
        });

        Ok(LogAnalyticsClient {
            workspace_id,
            key,
            url,
            timeout,
            client,
        })
    }

    /// Builds a signed request stamped with the current UTC time.
    pub fn build_signed_request(
        &self,
        event: &Value,
        log_type: LogType,
    ) -> Result<SignedRequest, IngestError> {
        self.build_signed_request_at(event, log_type, &rfc1123_timestamp())
    }

    /// Builds a signed request with an explicit `x-ms-date` timestamp.
    ///
    /// The signature is a pure function of (body bytes, timestamp, key), so
    /// pinning the timestamp makes the whole request deterministic.
    pub fn build_signed_request_at(
        &self,
        event: &Value,
        log_type: LogType,
        timestamp: &str,
    ) -> Result<SignedRequest, IngestError> {
        let body = serde_json::to_string(event)?;
        let signature = compute_signature(&self.key, body.len(), timestamp);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("SharedKey {}:{signature}", self.workspace_id))?,
        );
        headers.insert(
            HeaderName::from_static("log-type"),
            HeaderValue::from_static(log_type.as_str()),
        );
        headers.insert(
            HeaderName::from_static("x-ms-date"),
            HeaderValue::from_str(timestamp)?,
        );

        Ok(SignedRequest {
            url: self.url.clone(),
            body,
            headers,
        })
    }

    /// Issues the request. Bounded by the configured timeout; no retry, and a
    /// non-2xx status is not an error here: the caller decides success purely
    /// from the returned status code.
    pub async fn send(&self, request: SignedRequest) -> Result<(u16, String), IngestError> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .timeout(self.timeout)
            .body(request.body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        Ok((status, text))
    }

    /// Signs and sends a single event record as `<log_type>_CL`.
    pub async fn post_event(
        &self,
        event: &Value,
        log_type: LogType,
    ) -> Result<(u16, String), IngestError> {
        let request = self.build_signed_request(event, log_type)?;
        let (status, text) = self.send(request).await?;
        debug!("Log Analytics response: {status} for {log_type}");
        Ok((status, text))
    }
}

/// Canonical string-to-sign: method, body length, content type, `x-ms-date`
/// line, and resource path, each on its own line, no trailing newline.
fn string_to_sign(content_length: usize, timestamp: &str) -> String {
    format!("POST\n{content_length}\n{CONTENT_TYPE_JSON}\nx-ms-date:{timestamp}\n{RESOURCE_PATH}")
}

/// Base64-encoded HMAC-SHA256 of the string-to-sign.
pub fn compute_signature(key: &[u8], content_length: usize, timestamp: &str) -> String {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(string_to_sign(content_length, timestamp).as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Current UTC time as an RFC-1123 date with a `GMT` suffix, the format the
/// collector expects in `x-ms-date`.
pub fn rfc1123_timestamp() -> String {
    Utc::now().format(RFC1123_FORMAT).to_string()
}

/// Builds a reqwest client with optional proxy configuration and timeout.
fn build_client(
    proxy_url: Option<&str>,
    timeout: Duration,
) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = reqwest::Client::builder().timeout(timeout);
    if let Some(proxy) = proxy_url {
        builder = builder.proxy(reqwest::Proxy::https(proxy)?);
    }
    Ok(builder.build()?)
}
