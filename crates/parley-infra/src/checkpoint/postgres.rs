//! Postgres checkpoint store with idempotent self-provisioning.
//!
//! Bootstrap runs once at startup: connect to the administrative database,
//! create the target database if it does not exist (tolerating concurrent
//! creation by other workers), then ensure the `turns` table. Every step is
//! independently idempotent. Any unrecoverable failure surfaces as
//! `CheckpointError::Unavailable` so the selection logic can fall back to
//! the in-memory backend.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parley_core::checkpoint::CheckpointRepository;
use parley_types::config::DatabaseConfig;
use parley_types::error::CheckpointError;
use parley_types::thread::ThreadId;
use parley_types::turn::{Turn, TurnRole};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Connection, PgConnection, Row};
use tracing::info;

/// SQLSTATE for "database already exists"; a concurrent bootstrap won the
/// race, which counts as success.
const DUPLICATE_DATABASE: &str = "42P04";

/// One row per committed turn, keyed by (thread_id, position).
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS turns (
    thread_id  TEXT        NOT NULL,
    position   BIGINT      NOT NULL,
    role       TEXT        NOT NULL,
    content    TEXT        NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (thread_id, position)
)"#;

/// Postgres-backed implementation of `CheckpointRepository`.
pub struct PostgresCheckpointStore {
    pool: PgPool,
}

impl PostgresCheckpointStore {
    /// Connect to the configured database, provisioning it first if needed.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, CheckpointError> {
        ensure_database(cfg).await?;

        let pool = PgPoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(connect_options(cfg).database(&cfg.name))
            .await
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

        info!(database = %cfg.name, host = %cfg.host, "checkpoint schema ready");
        Ok(Self { pool })
    }

    /// Wrap an already-connected pool (tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    let opts = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user);
    if cfg.password.is_empty() {
        opts
    } else {
        opts.password(&cfg.password)
    }
}

/// Create the target database when absent, using the administrative
/// `postgres` database. Idempotent and safe under concurrent invocation.
async fn ensure_database(cfg: &DatabaseConfig) -> Result<(), CheckpointError> {
    if cfg.name == "postgres" {
        return Ok(());
    }
    // The database name is interpolated into DDL (identifiers cannot be
    // bound), so it must be a bare identifier.
    if !is_bare_identifier(&cfg.name) {
        return Err(CheckpointError::Unavailable(format!(
            "invalid database name '{}'",
            cfg.name
        )));
    }

    let mut conn = PgConnection::connect_with(&connect_options(cfg).database("postgres"))
        .await
        .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;

    let exists = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&cfg.name)
        .fetch_optional(&mut conn)
        .await
        .map_err(|e| CheckpointError::Unavailable(e.to_string()))?
        .is_some();

    if !exists {
        let create = format!(r#"CREATE DATABASE "{}""#, cfg.name);
        match sqlx::query(&create).execute(&mut conn).await {
            Ok(_) => info!(database = %cfg.name, "created checkpoint database"),
            Err(e) if is_duplicate_database(&e) => {
                info!(database = %cfg.name, "checkpoint database created concurrently");
            }
            Err(e) => {
                let _ = conn.close().await;
                return Err(CheckpointError::Unavailable(e.to_string()));
            }
        }
    }

    conn.close()
        .await
        .map_err(|e| CheckpointError::Unavailable(e.to_string()))?;
    Ok(())
}

fn is_bare_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_duplicate_database(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == DUPLICATE_DATABASE)
        .unwrap_or(false)
}

impl CheckpointRepository for PostgresCheckpointStore {
    async fn append(
        &self,
        thread: &ThreadId,
        role: TurnRole,
        content: &str,
    ) -> Result<Turn, CheckpointError> {
        let created_at = Utc::now();

        // Position is assigned in the same statement that inserts, so one
        // in-flight append per thread (the facade's single-flight lock)
        // always gets the next slot. A cross-process race on one thread
        // hits the primary key and surfaces as a query error rather than
        // reordering history.
        let row = sqlx::query(
            r#"INSERT INTO turns (thread_id, position, role, content, created_at)
               SELECT $1, COALESCE(MAX(position) + 1, 0), $2, $3, $4
               FROM turns WHERE thread_id = $1
               RETURNING position"#,
        )
        .bind(thread.as_str())
        .bind(role.to_string())
        .bind(content)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CheckpointError::Query(e.to_string()))?;

        let position: i64 = row
            .try_get("position")
            .map_err(|e| CheckpointError::Query(e.to_string()))?;

        Ok(Turn {
            position: position as u64,
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn replay(&self, thread: &ThreadId) -> Result<Vec<Turn>, CheckpointError> {
        let rows = sqlx::query(
            "SELECT position, role, content, created_at FROM turns \
             WHERE thread_id = $1 ORDER BY position ASC",
        )
        .bind(thread.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CheckpointError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let position: i64 = row
                    .try_get("position")
                    .map_err(|e| CheckpointError::Query(e.to_string()))?;
                let role: String = row
                    .try_get("role")
                    .map_err(|e| CheckpointError::Query(e.to_string()))?;
                let content: String = row
                    .try_get("content")
                    .map_err(|e| CheckpointError::Query(e.to_string()))?;
                let created_at: DateTime<Utc> = row
                    .try_get("created_at")
                    .map_err(|e| CheckpointError::Query(e.to_string()))?;

                Ok(Turn {
                    position: position as u64,
                    role: role.parse().map_err(CheckpointError::Query)?,
                    content,
                    created_at,
                })
            })
            .collect()
    }

    async fn exists(&self, thread: &ThreadId) -> Result<bool, CheckpointError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM turns WHERE thread_id = $1) AS found")
            .bind(thread.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CheckpointError::Query(e.to_string()))?;

        row.try_get("found")
            .map_err(|e| CheckpointError::Query(e.to_string()))
    }
}
