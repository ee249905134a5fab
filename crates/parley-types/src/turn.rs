//! Turn types: one role-tagged message within a thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Role of a turn within a thread.
///
/// `Reset` is the clear marker appended by the session facade; it is never
/// produced by a channel adapter and never surfaced in history output.
/// Context assembly treats the last reset marker as a hard boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    Reset,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
            TurnRole::Reset => write!(f, "reset"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TurnRole::User),
            "assistant" => Ok(TurnRole::Assistant),
            "reset" => Ok(TurnRole::Reset),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// One message within a thread.
///
/// `position` is assigned by the checkpoint backend: monotonic per thread,
/// never reused or rewritten once committed. Replay returns turns ordered
/// by position, which matches arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub position: u64,
    pub role: TurnRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a turn as the backend would commit it at a given position.
    pub fn new(position: u64, role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            position,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
