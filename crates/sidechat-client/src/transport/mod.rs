//! Transport layer (HTTP poll + send).
//!
//! The sync loop only ever sees the [`ChatTransport`] trait; production code
//! plugs in [`http::HttpTransport`], tests plug in scripted fakes.

pub mod http;

use async_trait::async_trait;

use sidechat_core::error::Result;
use sidechat_core::protocol::wire::MessageBatch;

pub use http::HttpTransport;

/// Network seam for the chat session.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch messages newer than `since_id`. Errors (network, non-2xx,
    /// undecodable body) are recovered by the caller via backoff-and-retry.
    async fn poll(&self, since_id: Option<&str>) -> Result<MessageBatch>;

    /// Outbound send. Best-effort: the caller drops the error without
    /// retrying — outbound chat is not guaranteed delivery.
    async fn send(&self, message: &str) -> Result<()>;
}
