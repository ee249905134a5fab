//! Agent runtime seam.
//!
//! The agent is an opaque external collaborator: given a thread identity,
//! the replayed context window, and a new user message, it returns a reply.

pub mod boxed;
pub mod runtime;

pub use boxed::BoxAgentRuntime;
pub use runtime::AgentRuntime;
