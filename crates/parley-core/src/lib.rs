//! Core business logic for Parley.
//!
//! Defines the trait seams (checkpoint repository, agent runtime, reply
//! delivery) and the session facade that every channel adapter calls.
//! Implementations live in parley-infra; this crate never depends on it.

pub mod agent;
pub mod checkpoint;
pub mod delivery;
pub mod session;
