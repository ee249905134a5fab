//! In-memory checkpoint store.
//!
//! Process-scoped fallback used when Postgres is unavailable at startup:
//! the service stays available, trading durability for availability.
//! History does not survive a restart.

use dashmap::DashMap;
use parley_core::checkpoint::CheckpointRepository;
use parley_types::error::CheckpointError;
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};

/// Mapping from thread identity to its ordered turn log.
///
/// Appends for one thread mutate the vector under the dashmap entry lock,
/// so concurrent same-thread appends can neither drop entries nor corrupt
/// ordering; positions come from the vector length.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    threads: DashMap<String, Vec<Turn>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointRepository for MemoryCheckpointStore {
    async fn append(
        &self,
        thread: &ThreadId,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn, CheckpointError> {
        let mut log = self.threads.entry(thread.as_str().to_string()).or_default();
        let turn = Turn::new(log.len() as u64, role, content);
        log.push(turn.clone());
        Ok(turn)
    }

    async fn replay(&self, thread: &ThreadId) -> Result<Vec<Turn>, CheckpointError> {
        Ok(self
            .threads
            .get(thread.as_str())
            .map(|log| log.clone())
            .unwrap_or_default())
    }

    async fn exists(&self, thread: &ThreadId) -> Result<bool, CheckpointError> {
        Ok(self
            .threads
            .get(thread.as_str())
            .is_some_and(|log| !log.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_append_and_replay_preserve_order() {
        let store = MemoryCheckpointStore::new();
        let thread = ThreadId::new("t");

        store.append(&thread, TurnRole::User, "one").await.unwrap();
        store
            .append(&thread, TurnRole::Assistant, "two")
            .await
            .unwrap();
        store.append(&thread, TurnRole::User, "three").await.unwrap();

        let turns = store.replay(&thread).await.unwrap();
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        let positions: Vec<u64> = turns.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_exists() {
        let store = MemoryCheckpointStore::new();
        let thread = ThreadId::new("t");

        assert!(!store.exists(&thread).await.unwrap());
        store.append(&thread, TurnRole::User, "hi").await.unwrap();
        assert!(store.exists(&thread).await.unwrap());
    }

    #[tokio::test]
    async fn test_replay_unknown_thread_is_empty() {
        let store = MemoryCheckpointStore::new();
        let turns = store.replay(&ThreadId::new("nope")).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_threads_are_isolated() {
        let store = MemoryCheckpointStore::new();
        store
            .append(&ThreadId::new("a"), TurnRole::User, "hi")
            .await
            .unwrap();

        assert!(store.replay(&ThreadId::new("b")).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_never_drop_or_collide() {
        let store = Arc::new(MemoryCheckpointStore::new());
        let thread = ThreadId::new("busy");

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = Arc::clone(&store);
            let thread = thread.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(&thread, TurnRole::User, &format!("msg-{i}"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let turns = store.replay(&thread).await.unwrap();
        assert_eq!(turns.len(), 50);
        // Positions are exactly 0..50 with no gaps or duplicates.
        let positions: Vec<u64> = turns.iter().map(|t| t.position).collect();
        assert_eq!(positions, (0..50).collect::<Vec<u64>>());
    }
}
