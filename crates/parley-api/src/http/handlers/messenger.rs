//! Facebook Messenger webhook handlers.
//!
//! - GET  /webhook/messenger — verification handshake: echo `hub.challenge`
//!   when the shared verify token matches, 403 otherwise.
//! - POST /webhook/messenger — page events. Each inbound text message runs
//!   one conversation turn on the deterministic `messenger_<psid>` thread
//!   and hands the reply to the delivery seam. The endpoint always
//!   acknowledges with 200 so Facebook does not retry; per-message failures
//!   are logged, never surfaced.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use parley_core::delivery::ReplyDelivery;
use parley_core::session::resolver;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters of the verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

/// GET /webhook/messenger — Facebook calls this during webhook setup.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    if params.mode == "subscribe"
        && !state.verify_token.is_empty()
        && params.verify_token == *state.verify_token
    {
        info!("messenger webhook verified");
        Ok(params.challenge)
    } else {
        warn!(mode = %params.mode, "messenger webhook verification failed");
        Err(AppError::Forbidden("Verification failed".to_string()))
    }
}

// Typed views of the event envelope. Unknown fields are ignored; missing
// ones default so a partial event is skipped instead of failing the batch.

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Sender>,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub is_echo: bool,
}

/// POST /webhook/messenger — handle incoming page events.
pub async fn receive(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<Value> {
    if payload.object != "page" {
        return Json(json!({ "status": "ignored", "reason": "not a page event" }));
    }

    for entry in &payload.entry {
        for event in &entry.messaging {
            let Some(sender) = event.sender.as_ref().filter(|s| !s.id.is_empty()) else {
                warn!("messenger event without sender psid, skipping");
                continue;
            };
            let Some(message) = &event.message else {
                continue;
            };
            if message.is_echo {
                continue;
            }
            let Some(text) = message.text.as_deref().filter(|t| !t.is_empty()) else {
                info!(psid = %sender.id, "non-text messenger message, skipping");
                continue;
            };

            if let Err(err) = process_message(&state, &sender.id, text).await {
                error!(psid = %sender.id, error = %err, "failed to process messenger message");
            }
        }
    }

    Json(json!({ "status": "ok" }))
}

/// Run one conversation turn for a Messenger end-user and deliver the reply.
async fn process_message(state: &AppState, psid: &str, text: &str) -> anyhow::Result<()> {
    let thread = resolver::messenger_thread(psid);

    let outcome = state.sessions.converse(&thread, text).await?;
    state.delivery.deliver(psid, &outcome.reply).await?;

    info!(psid = %psid, thread = %outcome.thread, "messenger message processed");
    Ok(())
}
