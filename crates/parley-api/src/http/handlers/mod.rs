//! Request handlers, grouped by surface.

pub mod chat;
pub mod messenger;
pub mod session;
