//! HTTP layer for the gateway.
//!
//! Axum router with two inbound channels (direct chat API and the Messenger
//! webhook) plus history, clear, and health endpoints. Errors map to the
//! generic `{success: false, message}` body; detail stays in the logs.

pub mod error;
pub mod handlers;
pub mod router;
