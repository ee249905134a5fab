//! Shared domain types for Parley.
//!
//! This crate has no business logic: it defines the thread/turn data model,
//! gateway configuration, and error enums shared by every other crate.

pub mod config;
pub mod error;
pub mod thread;
pub mod turn;
