//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use sidechat_core::error::{ChatError, Result};
use sidechat_core::protocol::wire::{MessageBatch, SendBody};

use super::ChatTransport;
use crate::config::{CredentialsPolicy, SessionConfig};

/// HTTP transport against `{endpoint}/poll` and `{endpoint}/send`.
///
/// The underlying `reqwest::Client` is shared by polls and sends; dropping
/// an in-flight poll future (the loop races it against its cancellation
/// token) aborts the request instead of letting it complete in the
/// background.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session_id: Option<String>,
}

impl HttpTransport {
    /// Build a transport from session config. Fails on a missing endpoint,
    /// unparsable headers, or a client build error.
    pub fn from_config(cfg: &SessionConfig) -> Result<Self> {
        let endpoint = cfg
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ChatError::Config("transport requires an endpoint".into()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &cfg.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ChatError::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ChatError::Config(format!("invalid value for header {name:?}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .default_headers(headers);
        if cfg.credentials == CredentialsPolicy::Include {
            builder = builder.cookie_store(true);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(format!("http client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_owned(),
            session_id: cfg.session_id.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn poll(&self, since_id: Option<&str>) -> Result<MessageBatch> {
        let mut req = self.client.get(format!("{}/poll", self.base_url));
        if let Some(id) = since_id {
            req = req.query(&[("since_id", id)]);
        }
        if let Some(sid) = self.session_id.as_deref() {
            req = req.query(&[("session_id", sid)]);
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        resp.json::<MessageBatch>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }

    async fn send(&self, message: &str) -> Result<()> {
        let body = SendBody {
            message,
            session_id: self.session_id.as_deref(),
        };

        let resp = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }
        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Transport("request timed out".into())
    } else if e.is_connect() {
        ChatError::Transport(format!("cannot reach chat endpoint: {e}"))
    } else {
        ChatError::Transport(e.to_string())
    }
}
