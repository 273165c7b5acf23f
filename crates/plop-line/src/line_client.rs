//! REST client for the Messaging API send and profile endpoints.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{MessagingTransport, ReplyPayload};

const REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct LineClientConfig {
    pub api_base: String,
    pub channel_access_token: String,
}

/// Messaging API client. One instance per process, shared via `Arc`.
pub struct LineClient {
    http: reqwest::Client,
    config: LineClientConfig,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(rename = "displayName")]
    display_name: String,
}

fn payload_messages(payload: &ReplyPayload) -> Vec<Value> {
    match payload {
        ReplyPayload::Text(text) => vec![json!({ "type": "text", "text": text })],
        ReplyPayload::TextWithImage {
            text,
            image_url,
            preview_url,
        } => vec![
            json!({ "type": "text", "text": text }),
            json!({
                "type": "image",
                "originalContentUrl": image_url,
                "previewImageUrl": preview_url,
            }),
        ],
    }
}

impl LineClient {
    pub fn new(config: LineClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .build()
            .context("failed to build line http client")?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<()> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.config.channel_access_token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("line request to {path} failed"))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("line {path} returned {status}: {detail}");
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingTransport for LineClient {
    async fn reply(&self, reply_token: &str, payload: &ReplyPayload) -> Result<()> {
        self.post_json(
            "/v2/bot/message/reply",
            json!({
                "replyToken": reply_token,
                "messages": payload_messages(payload),
            }),
        )
        .await
    }

    async fn push(&self, to: &str, text: &str) -> Result<()> {
        self.post_json(
            "/v2/bot/message/push",
            json!({
                "to": to,
                "messages": [{ "type": "text", "text": text }],
            }),
        )
        .await
    }

    async fn get_display_name(&self, user_id: &str) -> Result<String> {
        let response = self
            .http
            .get(self.url(&format!("/v2/bot/profile/{user_id}")))
            .bearer_auth(&self.config.channel_access_token)
            .send()
            .await
            .context("line profile request failed")?;
        let status = response.status();
        if !status.is_success() {
            bail!("line profile lookup returned {status}");
        }
        let profile: ProfileResponse = response
            .json()
            .await
            .context("failed to decode line profile response")?;
        Ok(profile.display_name)
    }
}
