//! LINE Messaging API transport.
//!
//! Covers the three capabilities the bot consumes: webhook intake
//! (signature check plus envelope decoding), the reply/push send paths,
//! and the profile lookup used to resolve display names.

use anyhow::Result;
use async_trait::async_trait;

pub mod line_client;
pub mod signature;
pub mod webhook;

pub use line_client::{LineClient, LineClientConfig};
pub use signature::{verify_signature, SignatureError};
pub use webhook::{EventSource, MessagePayload, WebhookEnvelope, WebhookEvent};

/// Outbound payload for one inbound message. The reply token is single-use,
/// so the dispatcher produces exactly one of these per message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
    Text(String),
    /// Two-part reply used by the rarity draw: caption plus an image.
    TextWithImage {
        text: String,
        image_url: String,
        preview_url: String,
    },
}

#[async_trait]
/// Seam over the messaging platform's outbound surface.
pub trait MessagingTransport: Send + Sync {
    async fn reply(&self, reply_token: &str, payload: &ReplyPayload) -> Result<()>;
    async fn push(&self, to: &str, text: &str) -> Result<()>;
    async fn get_display_name(&self, user_id: &str) -> Result<String>;
}
