//! CheckpointRepository trait definition.
//!
//! The durable append-and-replay log of per-thread turns. Implementations
//! live in parley-infra (`PostgresCheckpointStore`, `MemoryCheckpointStore`,
//! and the `CheckpointStore` union that selects between them at startup).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use parley_types::error::CheckpointError;
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};

/// Repository trait for thread turn persistence.
///
/// Invariants implementations must hold:
/// - `append` is append-only: committed turns are never edited or removed,
///   and positions are never reused.
/// - `replay` returns turns in exact append order, without truncation.
pub trait CheckpointRepository: Send + Sync {
    /// Append one turn to a thread. The backend assigns the next position
    /// and returns the turn as committed.
    fn append(
        &self,
        thread: &ThreadId,
        role: TurnRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<Turn, CheckpointError>> + Send;

    /// Replay the full turn sequence for a thread, oldest first.
    /// An unknown thread yields an empty Vec, not an error.
    fn replay(
        &self,
        thread: &ThreadId,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, CheckpointError>> + Send;

    /// Whether at least one turn has ever been appended under this identity.
    fn exists(
        &self,
        thread: &ThreadId,
    ) -> impl std::future::Future<Output = Result<bool, CheckpointError>> + Send;
}
