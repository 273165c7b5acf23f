//! Router wiring and request handlers.
//!
//! The callback handler verifies the webhook signature over the raw body
//! before touching the payload; a bad signature is a 400 with no partial
//! processing. Dispatch failures for individual events are logged and do
//! not fail the request, so the transport always gets its 200 `OK`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use plop_line::{verify_signature, MessagingTransport, WebhookEnvelope, WebhookEvent};
use plop_runtime::replies::{MORNING_REMINDER, NIGHT_REMINDER};
use plop_runtime::{run_reminder_sweep, Dispatcher, InboundMessage};
use plop_store::ContextRegistry;
use tokio::net::TcpListener;

const HOME_BANNER: &str = "💩 大便紀錄 Bot 運作中！";
const KEEPALIVE_BANNER: &str = "✅ I'm alive!";
const SIGNATURE_HEADER: &str = "x-line-signature";

/// Shared per-process state; everything in here is opened once at startup.
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub registry: Arc<dyn ContextRegistry>,
    pub transport: Arc<dyn MessagingTransport>,
    pub channel_secret: String,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route("/keepalive", get(handle_keepalive))
        .route("/callback", post(handle_callback))
        .route("/remind_morning", get(handle_remind_morning))
        .route("/remind_night", get(handle_remind_night))
        .with_state(state)
}

/// Binds and serves until ctrl-c.
pub async fn run_server(bind: &str, state: Arc<AppState>) -> Result<()> {
    let bind_addr = bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address '{bind}'"))?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound address")?;
    tracing::info!(%local_addr, "gateway listening");

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("gateway server exited unexpectedly")
}

async fn handle_home() -> &'static str {
    HOME_BANNER
}

async fn handle_keepalive() -> &'static str {
    KEEPALIVE_BANNER
}

async fn handle_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    if let Err(error) = verify_signature(&state.channel_secret, &body, signature) {
        tracing::warn!(%error, "webhook signature rejected");
        return (StatusCode::BAD_REQUEST, error.to_string());
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::warn!(%error, "webhook payload did not decode");
            return (StatusCode::BAD_REQUEST, "invalid webhook payload".to_string());
        }
    };

    for event in &envelope.events {
        if let Some(message) = inbound_message(event) {
            if let Err(error) = state.dispatcher.handle(&message).await {
                tracing::error!(%error, context_id = %message.context_id, "dispatch failed");
            }
        }
    }
    (StatusCode::OK, "OK".to_string())
}

/// Unpacks a webhook event into a dispatchable message. Non-text events
/// and events missing a reply token or source are skipped.
fn inbound_message(event: &WebhookEvent) -> Option<InboundMessage> {
    let text = event.text()?;
    let reply_token = event.reply_token.as_deref()?;
    let source = event.source.as_ref()?;
    let user_id = source.user_id.clone()?;
    let (context_kind, context_id) = match source.context() {
        Ok(context) => context,
        Err(error) => {
            tracing::warn!(%error, "skipping event with unresolvable source");
            return None;
        }
    };
    Some(InboundMessage {
        context_kind,
        context_id,
        user_id,
        reply_token: reply_token.to_string(),
        text: text.to_string(),
    })
}

async fn handle_remind_morning(State(state): State<Arc<AppState>>) -> String {
    run_reminder_sweep(
        state.registry.as_ref(),
        state.transport.as_ref(),
        MORNING_REMINDER,
    )
    .await
}

async fn handle_remind_night(State(state): State<Arc<AppState>>) -> String {
    run_reminder_sweep(
        state.registry.as_ref(),
        state.transport.as_ref(),
        NIGHT_REMINDER,
    )
    .await
}
