//! Thread identity resolver.
//!
//! Derives a stable thread identity from a channel tag and a channel-native
//! identifier, or mints a new one when the caller supplied none. Identities
//! are routing keys, not credentials: UUID-class entropy is enough for the
//! minted form, and caller-supplied ids pass through verbatim.

use parley_types::thread::{Channel, ThreadId};
use uuid::Uuid;

/// Prefix for identities minted on the direct API channel.
pub const API_SESSION_PREFIX: &str = "api_session_";

/// Prefix for deterministic Messenger thread identities.
pub const MESSENGER_PREFIX: &str = "messenger_";

/// Resolve a thread identity for any channel.
///
/// - Direct API: `supplied_session_id` wins when present and non-empty;
///   otherwise a fresh identity is minted. `external_id` is ignored.
/// - Messenger: deterministic per `external_id` (the PSID);
///   `supplied_session_id` is not applicable.
pub fn resolve(
    channel: Channel,
    external_id: Option<&str>,
    supplied_session_id: Option<&str>,
) -> ThreadId {
    match channel {
        Channel::Api => api_thread(supplied_session_id),
        Channel::Messenger => messenger_thread(external_id.unwrap_or_default()),
    }
}

/// Resolve a direct-API thread identity.
///
/// A present, non-empty supplied id is returned unchanged, with no format
/// checking. Otherwise a new `api_session_<token>` identity is minted.
pub fn api_thread(supplied_session_id: Option<&str>) -> ThreadId {
    match supplied_session_id {
        Some(id) if !id.is_empty() => ThreadId::new(id),
        _ => ThreadId::new(format!(
            "{API_SESSION_PREFIX}{}",
            Uuid::new_v4().simple()
        )),
    }
}

/// Resolve a Messenger thread identity: deterministic per page-scoped user
/// id, so repeat messages from one end-user always land on one thread.
pub fn messenger_thread(psid: &str) -> ThreadId {
    ThreadId::new(format!("{MESSENGER_PREFIX}{psid}"))
}
