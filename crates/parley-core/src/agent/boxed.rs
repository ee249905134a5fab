//! BoxAgentRuntime -- object-safe dynamic dispatch wrapper for AgentRuntime.
//!
//! 1. Define an object-safe `AgentRuntimeDyn` trait with boxed futures
//! 2. Blanket-impl `AgentRuntimeDyn` for all `T: AgentRuntime`
//! 3. `BoxAgentRuntime` wraps `Box<dyn AgentRuntimeDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parley_types::error::AgentError;
use parley_types::thread::ThreadId;
use parley_types::turn::Turn;

use super::runtime::AgentRuntime;

/// Object-safe version of [`AgentRuntime`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation is
/// provided for all types implementing `AgentRuntime`.
pub trait AgentRuntimeDyn: Send + Sync {
    fn reply_boxed<'a>(
        &'a self,
        thread: &'a ThreadId,
        history: &'a [Turn],
        user_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>>;
}

/// Blanket implementation: any `AgentRuntime` automatically implements
/// `AgentRuntimeDyn`.
impl<T: AgentRuntime> AgentRuntimeDyn for T {
    fn reply_boxed<'a>(
        &'a self,
        thread: &'a ThreadId,
        history: &'a [Turn],
        user_text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AgentError>> + Send + 'a>> {
        Box::pin(self.reply(thread, history, user_text))
    }
}

/// Type-erased agent runtime.
///
/// Since `AgentRuntime` uses RPITIT it cannot be a trait object directly;
/// `BoxAgentRuntime` provides equivalent dispatch, letting the API layer
/// pin one concrete state type while tests inject scripted runtimes.
pub struct BoxAgentRuntime {
    inner: Box<dyn AgentRuntimeDyn + Send + Sync>,
}

impl BoxAgentRuntime {
    /// Wrap a concrete `AgentRuntime` in a type-erased box.
    pub fn new<T: AgentRuntime + 'static>(runtime: T) -> Self {
        Self {
            inner: Box::new(runtime),
        }
    }
}

impl AgentRuntime for BoxAgentRuntime {
    async fn reply(
        &self,
        thread: &ThreadId,
        history: &[Turn],
        user_text: &str,
    ) -> Result<String, AgentError> {
        self.inner.reply_boxed(thread, history, user_text).await
    }
}
