//! Thread identity: the opaque key naming one conversation.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Inbound channel a message arrived on.
///
/// Each channel has its own thread identity construction rule (see the
/// resolver in parley-core): direct API callers get `api_session_*` ids,
/// Messenger end-users get deterministic `messenger_<psid>` ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Api,
    Messenger,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Api => write!(f, "api"),
            Channel::Messenger => write!(f, "messenger"),
        }
    }
}

/// Opaque string uniquely naming one conversation's turn sequence.
///
/// Caller-supplied identities are carried verbatim and never re-validated
/// against the generation rule; this is a routing key, not a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
