//! Session history and clear handlers.
//!
//! - GET    /sessions/{session_id}/history — replayed turns for display
//! - DELETE /sessions/{session_id}         — logical reset (idempotent)
//!
//! Both treat an identity with zero turns as success, not an error: history
//! returns an empty list and clear is a no-op, matching the facade.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use parley_types::thread::ThreadId;
use parley_types::turn::TurnRole;

use crate::http::error::AppError;
use crate::state::AppState;

/// One displayed message: role and content only.
#[derive(Debug, Serialize)]
pub struct TranscriptMessage {
    pub role: TurnRole,
    pub content: String,
}

/// Response body for the history endpoint.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub session_id: String,
    pub message_count: usize,
    pub messages: Vec<TranscriptMessage>,
}

/// Response body for the clear endpoint.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
}

/// GET /sessions/{session_id}/history
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let thread = ThreadId::new(session_id.clone());

    let turns = state.sessions.history(&thread).await?;
    let messages: Vec<TranscriptMessage> = turns
        .into_iter()
        .map(|t| TranscriptMessage {
            role: t.role,
            content: t.content,
        })
        .collect();

    Ok(Json(HistoryResponse {
        success: true,
        session_id,
        message_count: messages.len(),
        messages,
    }))
}

/// DELETE /sessions/{session_id}
///
/// Stored turns are not purged; the next message on this identity starts a
/// fresh context.
pub async fn clear(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>, AppError> {
    let thread = ThreadId::new(session_id.clone());

    state.sessions.clear(&thread).await?;

    Ok(Json(ClearResponse {
        success: true,
        message: format!("Session {session_id} reset. Send a new message to start fresh."),
        session_id,
    }))
}
