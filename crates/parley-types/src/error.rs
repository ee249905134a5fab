use thiserror::Error;

/// Errors from checkpoint store operations.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The persistent backend could not be reached or provisioned at
    /// startup. Recovered by falling back to the in-memory backend;
    /// never raised by an already-selected backend.
    #[error("checkpoint backend unavailable: {0}")]
    Unavailable(String),

    /// A call against the selected backend failed mid-operation. Surfaced
    /// to the caller as-is; never retried against a different backend.
    #[error("checkpoint query failed: {0}")]
    Query(String),
}

/// Errors from agent runtime invocation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent runtime timed out after {0}s")]
    Timeout(u64),

    #[error("agent runtime error: {0}")]
    Provider(String),

    #[error("agent returned an empty reply")]
    EmptyReply,
}

/// Errors surfaced by the session facade.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Errors from outbound reply delivery (Messenger channel).
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("reply delivery failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_error_display() {
        let err = CheckpointError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "checkpoint query failed: syntax error");
    }

    #[test]
    fn test_agent_timeout_display() {
        let err = AgentError::Timeout(30);
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_session_error_from_checkpoint() {
        let err: SessionError = CheckpointError::Unavailable("refused".to_string()).into();
        assert!(matches!(err, SessionError::Checkpoint(_)));
    }
}
