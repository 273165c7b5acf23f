//! Inbound webhook envelope types.

use anyhow::{bail, Context, Result};
use plop_core::ContextKind;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
/// Top-level webhook body; one request may carry several events.
pub struct WebhookEnvelope {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "replyToken", default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<MessagePayload>,
}

impl WebhookEvent {
    /// Trimmed text when this is a text-message event; anything else
    /// (stickers, joins, unsends) is skipped by the gateway.
    pub fn text(&self) -> Option<&str> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        message.text.as_deref().map(str::trim)
    }
}

#[derive(Debug, Clone, Deserialize)]
/// The transport's source descriptor: who sent this, and from where.
pub struct EventSource {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "groupId", default)]
    pub group_id: Option<String>,
    #[serde(rename = "roomId", default)]
    pub room_id: Option<String>,
}

impl EventSource {
    /// Resolves the conversation context: the user id for direct chats,
    /// the group/room id otherwise.
    pub fn context(&self) -> Result<(ContextKind, String)> {
        match self.source_type.as_str() {
            "user" => Ok((
                ContextKind::User,
                self.user_id.clone().context("user source missing userId")?,
            )),
            "group" => Ok((
                ContextKind::Group,
                self.group_id
                    .clone()
                    .context("group source missing groupId")?,
            )),
            "room" => Ok((
                ContextKind::Room,
                self.room_id.clone().context("room source missing roomId")?,
            )),
            other => bail!("unknown source type '{other}'"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}
