//! Application state wiring the session facade to its backends.
//!
//! The facade is generic over its seams; AppState pins it to the startup
//! selected checkpoint backend and a boxed agent runtime (boxed so tests
//! can swap in scripted runtimes without a second state type).

use std::sync::Arc;

use parley_core::agent::BoxAgentRuntime;
use parley_core::delivery::BoxReplyDelivery;
use parley_core::session::SessionService;
use parley_infra::agent::OpenAiCompatibleRuntime;
use parley_infra::checkpoint::CheckpointStore;
use parley_infra::config::load_config;
use parley_infra::delivery::LoggingReplyDelivery;
use parley_types::config::GatewayConfig;

/// Session facade pinned to the concrete backend types.
pub type ConcreteSessionService = SessionService<CheckpointStore, BoxAgentRuntime>;

/// Shared application state used by every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ConcreteSessionService>,
    pub delivery: Arc<BoxReplyDelivery>,
    pub verify_token: Arc<str>,
    /// Whether the selected checkpoint backend survives restarts.
    pub durable: bool,
}

impl AppState {
    /// Initialize from the environment: select the checkpoint backend
    /// (falling back to in-memory when Postgres is unreachable) and wire
    /// the agent runtime.
    pub async fn init() -> anyhow::Result<Self> {
        let config = load_config();
        let store = CheckpointStore::connect(&config.database).await;
        let agent = BoxAgentRuntime::new(OpenAiCompatibleRuntime::new(&config.agent));

        Ok(Self::new(
            store,
            agent,
            BoxReplyDelivery::new(LoggingReplyDelivery::new()),
            &config,
        ))
    }

    /// Wire state from explicit parts (used by init and by router tests).
    pub fn new(
        store: CheckpointStore,
        agent: BoxAgentRuntime,
        delivery: BoxReplyDelivery,
        config: &GatewayConfig,
    ) -> Self {
        let durable = store.is_durable();
        Self {
            sessions: Arc::new(SessionService::new(store, agent)),
            delivery: Arc::new(delivery),
            verify_token: Arc::from(config.messenger.verify_token.as_str()),
            durable,
        }
    }
}
