//! Environment configuration loader.
//!
//! Reads the gateway configuration from environment variables, falling back
//! to [`GatewayConfig::default`] values when a variable is unset and
//! warning-and-defaulting when one is malformed. The lookup function is
//! injectable so tests never mutate process-global environment state.

use parley_types::config::{AgentConfig, DatabaseConfig, GatewayConfig, MessengerConfig};
use tracing::warn;

/// Load configuration from the process environment.
pub fn load_config() -> GatewayConfig {
    load_config_with(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary lookup function.
pub fn load_config_with(lookup: impl Fn(&str) -> Option<String>) -> GatewayConfig {
    let db_defaults = DatabaseConfig::default();
    let agent_defaults = AgentConfig::default();

    let database = DatabaseConfig {
        host: lookup("DB_HOST").unwrap_or(db_defaults.host),
        port: parse_or("DB_PORT", &lookup, db_defaults.port),
        name: lookup("DB_NAME").unwrap_or(db_defaults.name),
        user: lookup("DB_USER").unwrap_or(db_defaults.user),
        password: lookup("DB_PASSWORD").unwrap_or(db_defaults.password),
    };

    let messenger = MessengerConfig {
        verify_token: lookup("FACEBOOK_VERIFY_TOKEN").unwrap_or_default(),
    };

    let agent = AgentConfig {
        // AGENT_API_KEY wins; OPENAI_API_KEY kept for drop-in deployments.
        api_key: lookup("AGENT_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .unwrap_or(agent_defaults.api_key),
        base_url: lookup("AGENT_BASE_URL").unwrap_or(agent_defaults.base_url),
        model: lookup("AGENT_MODEL").unwrap_or(agent_defaults.model),
        system_prompt: lookup("AGENT_SYSTEM_PROMPT").filter(|s| !s.is_empty()),
        temperature: parse_or("AGENT_TEMPERATURE", &lookup, agent_defaults.temperature),
        timeout_secs: parse_or("AGENT_TIMEOUT_SECS", &lookup, agent_defaults.timeout_secs),
    };

    GatewayConfig {
        database,
        messenger,
        agent,
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, "malformed config value, using default");
                default
            }
        },
        None => default,
    }
}
