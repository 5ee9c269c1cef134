// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;

const DEFAULT_FORWARDER_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Process-wide configuration, read once at startup.
///
/// The workspace credentials are optional here on purpose: the forwarder must
/// come up and answer requests even when they are absent, failing each
/// forwarding attempt with a configuration error instead of refusing to
/// start. They are never re-read from the environment after construction, so
/// tests can build a `Config` by hand without mutating the process
/// environment.
pub struct Config {
    /// Log Analytics workspace identifier
    pub workspace_id: Option<String>,
    /// Base64-encoded shared signing key. Treated as a secret; never logged.
    pub shared_key: Option<String>,
    /// Full ingestion endpoint override. Primarily used by integration tests
    /// to point the client at a local mock intake.
    pub url_override: Option<String>,
    /// Timeout for each outbound ingestion request, in seconds
    pub request_timeout_secs: u64,
    pub forwarder_port: u16,
    pub max_request_content_length: usize,
    pub proxy_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            workspace_id: non_empty_var("LOG_ANALYTICS_WORKSPACE_ID"),
            shared_key: non_empty_var("LOG_ANALYTICS_PRIMARY_KEY"),
            url_override: non_empty_var("LOG_ANALYTICS_URL"),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            forwarder_port: env::var("FORWARDER_PORT")
                .ok()
                .and_then(|port| port.parse::<u16>().ok())
                .unwrap_or(DEFAULT_FORWARDER_PORT),
            max_request_content_length: 10 * 1024 * 1024, // 10MB in Bytes
            proxy_url: env::var("HTTPS_PROXY").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workspace_id: None,
            shared_key: None,
            url_override: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            forwarder_port: DEFAULT_FORWARDER_PORT,
            max_request_content_length: 10 * 1024 * 1024,
            proxy_url: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace_id", &self.workspace_id)
            .field("shared_key", &self.shared_key.as_ref().map(|_| "<redacted>"))
            .field("url_override", &self.url_override)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("forwarder_port", &self.forwarder_port)
            .field(
                "max_request_content_length",
                &self.max_request_content_length,
            )
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

/// An unset variable and an empty one are both treated as absent, so an
/// `export LOG_ANALYTICS_PRIMARY_KEY=` left over in a shell profile cannot
/// smuggle empty key material into the signer.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|val| !val.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    use crate::config::Config;

    #[test]
    #[serial]
    fn test_defaults_when_env_unset() {
        env::remove_var("LOG_ANALYTICS_WORKSPACE_ID");
        env::remove_var("LOG_ANALYTICS_PRIMARY_KEY");
        env::remove_var("LOG_ANALYTICS_URL");
        env::remove_var("FORWARDER_PORT");

        let config = Config::from_env();
        assert_eq!(config.workspace_id, None);
        assert_eq!(config.shared_key, None);
        assert_eq!(config.url_override, None);
        assert_eq!(config.forwarder_port, 8080);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn test_credentials_from_env() {
        env::set_var("LOG_ANALYTICS_WORKSPACE_ID", "abc-123");
        env::set_var("LOG_ANALYTICS_PRIMARY_KEY", "c2VjcmV0");

        let config = Config::from_env();
        assert_eq!(config.workspace_id.as_deref(), Some("abc-123"));
        assert_eq!(config.shared_key.as_deref(), Some("c2VjcmV0"));

        env::remove_var("LOG_ANALYTICS_WORKSPACE_ID");
        env::remove_var("LOG_ANALYTICS_PRIMARY_KEY");
    }

    #[test]
    #[serial]
    fn test_empty_credentials_are_absent() {
        env::set_var("LOG_ANALYTICS_WORKSPACE_ID", "  ");
        env::set_var("LOG_ANALYTICS_PRIMARY_KEY", "");

        let config = Config::from_env();
        assert_eq!(config.workspace_id, None);
        assert_eq!(config.shared_key, None);

        env::remove_var("LOG_ANALYTICS_WORKSPACE_ID");
        env::remove_var("LOG_ANALYTICS_PRIMARY_KEY");
    }

    #[test]
    #[serial]
    fn test_custom_forwarder_port() {
        env::set_var("FORWARDER_PORT", "18080");
        let config = Config::from_env();
        assert_eq!(config.forwarder_port, 18080);
        env::remove_var("FORWARDER_PORT");
    }

    #[test]
    #[serial]
    fn test_invalid_forwarder_port_falls_back() {
        env::set_var("FORWARDER_PORT", "not_a_port");
        let config = Config::from_env();
        assert_eq!(config.forwarder_port, 8080);
        env::remove_var("FORWARDER_PORT");
    }

    #[test]
    fn test_debug_redacts_shared_key() {
        let config = Config {
            workspace_id: Some("abc-123".to_string()),
            shared_key: Some("c2VjcmV0".to_string()),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("c2VjcmV0"));
        assert!(rendered.contains("<redacted>"));
    }
}
