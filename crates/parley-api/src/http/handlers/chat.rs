//! Direct chat API handler.
//!
//! POST /chat
//!
//! Resolves the thread identity (caller-supplied session id verbatim, or a
//! freshly minted one), runs one conversation turn through the session
//! facade, and returns the reply together with the identity the caller
//! should use to continue.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use parley_core::session::resolver;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user message to send to the agent.
    pub message: String,
    /// Existing session id to continue; if absent, a new one is minted.
    pub session_id: Option<String>,
}

/// Response body for the chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    /// The agent's reply.
    pub message: String,
    pub session_id: String,
    pub timestamp: String,
}

/// POST /chat — run one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation(
            "message must not be empty".to_string(),
        ));
    }

    let thread = resolver::api_thread(body.session_id.as_deref());

    let outcome = state.sessions.converse(&thread, &body.message).await?;

    Ok(Json(ChatResponse {
        success: true,
        message: outcome.reply,
        session_id: outcome.thread.into_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
