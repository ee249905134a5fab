//! Session facade: the single entry point used by both channel adapters.
//!
//! `converse` appends the user turn, invokes the agent runtime with the
//! active context window, appends the assistant turn, and returns the reply.
//! Per-thread single-flight locking keeps concurrent messages on one thread
//! from interleaving their replay content; independent threads run in
//! parallel.

use std::sync::Arc;

use dashmap::DashMap;
use parley_types::error::{CheckpointError, SessionError};
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::agent::AgentRuntime;
use crate::checkpoint::CheckpointRepository;

/// Result of one converse call: the generated reply and the thread identity
/// it was recorded under, so a caller who omitted one learns the minted id.
#[derive(Debug, Clone)]
pub struct ConverseOutcome {
    pub reply: String,
    pub thread: ThreadId,
}

/// Orchestrates the conversation lifecycle over a checkpoint repository
/// and an agent runtime.
///
/// Generic over both seams so the facade stays testable with injected
/// fakes; parley-api pins them to the infra implementations.
pub struct SessionService<C: CheckpointRepository, A: AgentRuntime> {
    checkpoints: C,
    agent: A,
    /// Single-flight locks, one per thread identity. Entries are tiny and
    /// kept for the process lifetime; the set of live threads bounds them.
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<C: CheckpointRepository, A: AgentRuntime> SessionService<C, A> {
    pub fn new(checkpoints: C, agent: A) -> Self {
        Self {
            checkpoints,
            agent,
            locks: DashMap::new(),
        }
    }

    /// Access the checkpoint repository.
    pub fn checkpoints(&self) -> &C {
        &self.checkpoints
    }

    fn thread_lock(&self, thread: &ThreadId) -> Arc<Mutex<()>> {
        self.locks
            .entry(thread.as_str().to_string())
            .or_default()
            .clone()
    }

    /// Run one conversation turn on a thread.
    ///
    /// The user turn is committed before the agent is invoked; if the agent
    /// fails or times out, the user turn stays in the log (a retry will see
    /// it in replay) and no assistant turn is written. The assistant turn
    /// is committed only on full success.
    pub async fn converse(
        &self,
        thread: &ThreadId,
        user_text: &str,
    ) -> Result<ConverseOutcome, SessionError> {
        let lock = self.thread_lock(thread);
        let _guard = lock.lock().await;

        let turns = self.checkpoints.replay(thread).await?;
        if turns.is_empty() {
            info!(thread = %thread, "starting new conversation thread");
        }
        let context = context_window(&turns);

        self.checkpoints
            .append(thread, TurnRole::User, user_text)
            .await?;

        let reply = match self.agent.reply(thread, context, user_text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(thread = %thread, error = %err, "agent invocation failed; user turn remains committed");
                return Err(err.into());
            }
        };

        self.checkpoints
            .append(thread, TurnRole::Assistant, &reply)
            .await?;

        debug!(thread = %thread, context_turns = context.len(), "conversation turn completed");

        Ok(ConverseOutcome {
            reply,
            thread: thread.clone(),
        })
    }

    /// Conversation history for display: the active context window, reset
    /// markers excluded. An identity with no turns yields an empty Vec.
    pub async fn history(&self, thread: &ThreadId) -> Result<Vec<Turn>, CheckpointError> {
        let turns = self.checkpoints.replay(thread).await?;
        Ok(context_window(&turns).to_vec())
    }

    /// Mark a thread as logically reset.
    ///
    /// Stored turns are not purged (the log is append-only); a reset marker
    /// turn is appended and context assembly starts fresh after it. No-op
    /// when the thread has no turns or already ends with a marker, so
    /// repeated clears are idempotent.
    pub async fn clear(&self, thread: &ThreadId) -> Result<(), CheckpointError> {
        let lock = self.thread_lock(thread);
        let _guard = lock.lock().await;

        let turns = self.checkpoints.replay(thread).await?;
        match turns.last() {
            None => return Ok(()),
            Some(last) if last.role == TurnRole::Reset => return Ok(()),
            Some(_) => {}
        }

        self.checkpoints
            .append(thread, TurnRole::Reset, "")
            .await?;
        info!(thread = %thread, "session cleared");
        Ok(())
    }
}

/// Slice the active context window: everything after the last reset marker.
fn context_window(turns: &[Turn]) -> &[Turn] {
    match turns.iter().rposition(|t| t.role == TurnRole::Reset) {
        Some(i) => &turns[i + 1..],
        None => turns,
    }
}
