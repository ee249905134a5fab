//! Gateway configuration.
//!
//! The structs live here; the environment loader lives in parley-infra.
//! Defaults mirror a local development deployment: Postgres on localhost,
//! no Messenger verify token (webhook verification always fails until one
//! is configured), OpenAI defaults for the agent runtime.

use serde::{Deserialize, Serialize};

/// Connection parameters for the persistent checkpoint store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    /// Target database; created at bootstrap when absent.
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "support_chat".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
        }
    }
}

/// Messenger webhook settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessengerConfig {
    /// Shared token echoed back by Facebook during the verification
    /// handshake. Empty means verification always fails.
    pub verify_token: String,
}

/// Agent runtime settings (OpenAI-compatible chat completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// System prompt prepended to every completion request.
    pub system_prompt: Option<String>,
    pub temperature: f32,
    /// Hard ceiling on one agent invocation; converse fails recoverably
    /// past it.
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-mini".to_string(),
            system_prompt: None,
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub database: DatabaseConfig,
    pub messenger: MessengerConfig,
    pub agent: AgentConfig,
}
