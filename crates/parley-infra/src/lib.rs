//! Infrastructure implementations for Parley.
//!
//! Concrete backends for the trait seams defined in parley-core: the
//! Postgres and in-memory checkpoint stores (plus startup selection between
//! them), the OpenAI-compatible agent runtime, outbound reply delivery, and
//! the environment configuration loader.

pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod delivery;
