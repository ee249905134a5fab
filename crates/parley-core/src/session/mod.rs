//! Conversation session layer: thread identity resolution and the facade
//! used by every channel adapter.

pub mod resolver;
pub mod service;

pub use service::{ConverseOutcome, SessionService};
