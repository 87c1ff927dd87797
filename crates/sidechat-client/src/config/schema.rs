use std::collections::HashMap;

use serde::Deserialize;

use sidechat_core::error::{ChatError, Result};

/// Whether chat requests carry cookies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsPolicy {
    /// No cookie store; every request is anonymous.
    #[default]
    Omit,
    /// Keep a cookie store and attach cookies to every request.
    Include,
}

/// Immutable per-session configuration.
///
/// Supplied once at construction (programmatically or from YAML) and never
/// mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Chat endpoint base URL. Absent or empty: polling is never started
    /// and chat stays purely local.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Server-side stream identifier, carried on poll and send when set.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Extra headers attached to every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub credentials: CredentialsPolicy,

    /// Display name for inbound text messages without a `user` field.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Display name for locally echoed user input.
    #[serde(default = "default_local_name")]
    pub local_name: String,

    /// Input placeholder; passed through to the UI layer untouched.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Delay before retrying a failed poll.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            session_id: None,
            headers: HashMap::new(),
            credentials: CredentialsPolicy::default(),
            bot_name: default_bot_name(),
            local_name: default_local_name(),
            placeholder: default_placeholder(),
            backoff_ms: default_backoff_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl SessionConfig {
    /// Config pointed at a chat endpoint, everything else defaulted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Whether a sync loop should ever be started for this session.
    pub fn polling_enabled(&self) -> bool {
        matches!(&self.endpoint, Some(e) if !e.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.is_empty()
                && !endpoint.starts_with("http://")
                && !endpoint.starts_with("https://")
            {
                return Err(ChatError::Config(
                    "endpoint must be an http(s) URL".into(),
                ));
            }
        }
        if !(100..=60_000).contains(&self.backoff_ms) {
            return Err(ChatError::Config(
                "backoff_ms must be between 100 and 60000".into(),
            ));
        }
        if !(1_000..=120_000).contains(&self.request_timeout_ms) {
            return Err(ChatError::Config(
                "request_timeout_ms must be between 1000 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_bot_name() -> String {
    "Bot".into()
}
fn default_local_name() -> String {
    "You".into()
}
fn default_placeholder() -> String {
    "Type a message…".into()
}
fn default_backoff_ms() -> u64 {
    1_000
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
