//! AgentRuntime trait definition.

use parley_types::error::AgentError;
use parley_types::thread::ThreadId;
use parley_types::turn::Turn;

/// A conversational agent invoked with a thread identity and a new user
/// message, returning a reply generated with full awareness of the prior
/// turns handed to it.
///
/// The facade passes `history` already sliced to the active context window
/// (everything after the last reset marker), so implementations treat it as
/// the complete conversation so far. Implementations must bound their own
/// latency: a call that cannot finish in time fails with
/// [`AgentError::Timeout`] rather than hanging the converse call.
pub trait AgentRuntime: Send + Sync {
    /// Generate a reply to `user_text` in the context of `history`.
    fn reply(
        &self,
        thread: &ThreadId,
        history: &[Turn],
        user_text: &str,
    ) -> impl std::future::Future<Output = Result<String, AgentError>> + Send;
}
