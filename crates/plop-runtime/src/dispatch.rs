//! Per-message dispatch: classify, authorize for the context, execute,
//! produce exactly one outcome.
//!
//! The dispatcher is stateless across messages. Store failures never
//! escape: every execute branch folds them into a ⚠️-prefixed reply so
//! the request always completes from the transport's point of view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use plop_core::{
    classify, format_timestamp, Classification, Command, ContextKind, EventRecord, RegistryKind,
    Window, UNKNOWN_USER_NAME,
};
use plop_line::{MessagingTransport, ReplyPayload};
use plop_store::{ContextRegistry, EventLogStore};

use crate::aggregate::{leaderboard, self_count};
use crate::draw::draw_tier;
use crate::replies;

/// One inbound text message, already unpacked from the webhook envelope.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub context_kind: ContextKind,
    pub context_id: String,
    pub user_id: String,
    pub reply_token: String,
    /// Trimmed message text.
    pub text: String,
}

/// Three-way outcome: stay silent, or send one reply payload. The silent
/// case is deliberate group-chat noise suppression, distinct from both
/// success and failure replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ignored,
    Reply(ReplyPayload),
}

/// Orchestrates one webhook message end to end. Dependencies are injected
/// once at process start and shared for the process lifetime.
pub struct Dispatcher {
    log: Arc<dyn EventLogStore>,
    registry: Arc<dyn ContextRegistry>,
    transport: Arc<dyn MessagingTransport>,
    timezone: Tz,
    draw_enabled: bool,
}

impl Dispatcher {
    pub fn new(
        log: Arc<dyn EventLogStore>,
        registry: Arc<dyn ContextRegistry>,
        transport: Arc<dyn MessagingTransport>,
        timezone: Tz,
        draw_enabled: bool,
    ) -> Self {
        Self {
            log,
            registry,
            transport,
            timezone,
            draw_enabled,
        }
    }

    /// Handles one message and sends the reply, if any. The reply token is
    /// single-use, so at most one send happens here.
    pub async fn handle(&self, message: &InboundMessage) -> anyhow::Result<()> {
        let now = Utc::now().with_timezone(&self.timezone);
        match self.process(message, now).await {
            DispatchOutcome::Ignored => Ok(()),
            DispatchOutcome::Reply(payload) => {
                self.transport.reply(&message.reply_token, &payload).await
            }
        }
    }

    /// Runs the dispatch state machine with an explicit clock.
    pub async fn process(&self, message: &InboundMessage, now: DateTime<Tz>) -> DispatchOutcome {
        let actor_name = match self.transport.get_display_name(&message.user_id).await {
            Ok(name) => name,
            Err(error) => {
                tracing::debug!(user_id = %message.user_id, %error, "profile lookup failed");
                UNKNOWN_USER_NAME.to_string()
            }
        };

        // Contexts register on first contact, before any gating, so even a
        // never-commanding group still receives broadcast reminders.
        if let Err(error) = self
            .registry
            .append_if_absent(&message.context_id, RegistryKind::from(message.context_kind))
            .await
        {
            tracing::warn!(context_id = %message.context_id, %error, "context registration failed");
        }

        let command = match classify(&message.text, message.context_kind, self.draw_enabled) {
            Classification::Ignored => return DispatchOutcome::Ignored,
            Classification::Unrecognized => {
                return DispatchOutcome::Reply(ReplyPayload::Text(
                    replies::UNRECOGNIZED.to_string(),
                ))
            }
            Classification::Command(command) => command,
        };

        let text = match command {
            Command::LogEvent => self.append_event(message, &actor_name, now).await,
            Command::SelfCount(window) => self.run_self_count(&actor_name, window, now).await,
            Command::Leaderboard(window) => self.run_leaderboard(message, window, now).await,
            Command::EasterEggFeeder => replies::feeder_egg(&actor_name),
            Command::EasterEggKing => replies::KING_EGG.to_string(),
            Command::Help => replies::HELP_TEXT.to_string(),
            Command::RandomDraw => {
                let tier = draw_tier(&mut rand::thread_rng());
                return DispatchOutcome::Reply(ReplyPayload::TextWithImage {
                    text: tier.caption.to_string(),
                    image_url: tier.image_url.to_string(),
                    preview_url: tier.preview_url.to_string(),
                });
            }
        };
        DispatchOutcome::Reply(ReplyPayload::Text(text))
    }

    async fn append_event(
        &self,
        message: &InboundMessage,
        actor_name: &str,
        now: DateTime<Tz>,
    ) -> String {
        let record = EventRecord {
            actor_name: actor_name.to_string(),
            timestamp: format_timestamp(now),
            label: message.text.clone(),
            context_kind: message.context_kind,
            context_id: message.context_id.clone(),
        };
        match self.log.append(&record).await {
            Ok(()) => replies::LOG_SUCCESS.to_string(),
            Err(error) => {
                tracing::warn!(%error, "event append failed");
                replies::log_failure(error)
            }
        }
    }

    async fn run_self_count(&self, actor_name: &str, window: Window, now: DateTime<Tz>) -> String {
        let result = match self.log.read_all().await {
            Ok(records) => self_count(&records, actor_name, window, now),
            Err(error) => Err(error),
        };
        match result {
            Ok(count) => replies::self_count_reply(window, count),
            Err(error) => {
                tracing::warn!(%error, "self count query failed");
                replies::query_failure(error)
            }
        }
    }

    async fn run_leaderboard(
        &self,
        message: &InboundMessage,
        window: Window,
        now: DateTime<Tz>,
    ) -> String {
        let result = match self.log.read_all().await {
            Ok(records) => leaderboard(
                &records,
                message.context_kind,
                &message.context_id,
                window,
                now,
            ),
            Err(error) => Err(error),
        };
        match result {
            Ok(entries) => replies::leaderboard_reply(window, &entries),
            Err(error) => {
                tracing::warn!(%error, "leaderboard query failed");
                replies::leaderboard_failure(window, error)
            }
        }
    }
}
