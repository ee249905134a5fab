//! Checkpoint store backends and startup selection.
//!
//! Two interchangeable backends implement the core `CheckpointRepository`
//! trait: Postgres (durable) and in-memory (process-scoped fallback). The
//! backend is negotiated once at startup by [`CheckpointStore::connect`] and
//! fixed for the process lifetime; a backend that fails later surfaces hard
//! errors instead of silently switching, which would split a thread's
//! history across stores.

pub mod memory;
pub mod postgres;

use parley_core::checkpoint::CheckpointRepository;
use parley_types::config::DatabaseConfig;
use parley_types::error::CheckpointError;
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};
use tracing::{info, warn};

pub use memory::MemoryCheckpointStore;
pub use postgres::PostgresCheckpointStore;

/// The backend selected to serve checkpoint operations.
pub enum CheckpointStore {
    Postgres(PostgresCheckpointStore),
    Memory(MemoryCheckpointStore),
}

impl CheckpointStore {
    /// Negotiate the backend: try Postgres (bootstrapping it if needed),
    /// fall back to in-memory when the store is unreachable. The service
    /// stays available either way.
    pub async fn connect(cfg: &DatabaseConfig) -> Self {
        match PostgresCheckpointStore::connect(cfg).await {
            Ok(store) => {
                info!(database = %cfg.name, "checkpoint store: postgres backend selected");
                Self::Postgres(store)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    "persistent checkpoint store unavailable; falling back to in-memory backend (history will not survive a restart)"
                );
                Self::Memory(MemoryCheckpointStore::new())
            }
        }
    }

    /// Whether turns written to this backend survive a process restart.
    pub fn is_durable(&self) -> bool {
        matches!(self, Self::Postgres(_))
    }
}

impl CheckpointRepository for CheckpointStore {
    async fn append(
        &self,
        thread: &ThreadId,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn, CheckpointError> {
        match self {
            Self::Postgres(store) => store.append(thread, role, content).await,
            Self::Memory(store) => store.append(thread, role, content).await,
        }
    }

    async fn replay(&self, thread: &ThreadId) -> Result<Vec<Turn>, CheckpointError> {
        match self {
            Self::Postgres(store) => store.replay(thread).await,
            Self::Memory(store) => store.replay(thread).await,
        }
    }

    async fn exists(&self, thread: &ThreadId) -> Result<bool, CheckpointError> {
        match self {
            Self::Postgres(store) => store.exists(thread).await,
            Self::Memory(store) => store.exists(thread).await,
        }
    }
}
