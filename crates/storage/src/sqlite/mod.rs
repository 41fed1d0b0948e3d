use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use nobocon_core::Snapshot;

use crate::repository::{
    Decoded, SLOT_KEY, SnapshotStore, StorageError, StoreStatus, decode_payload,
};

const PROBE_KEY: &str = "__nobocon_probe__";

/// SQLite-backed snapshot slot.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteStore {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// the connection pragmas fail during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the slot table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the migration query fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS snapshot_slot (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL
            );
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert(&self, key: &str, payload: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            INSERT INTO snapshot_slot (key, payload)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET payload = excluded.payload
            ",
        )
        .bind(key)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM snapshot_slot WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn probe(&self) -> StoreStatus {
        let cycle = async {
            self.upsert(PROBE_KEY, "1").await?;
            self.delete(PROBE_KEY).await
        };
        match cycle.await {
            Ok(()) => StoreStatus::Available,
            Err(err) => StoreStatus::Unavailable {
                reason: err.to_string(),
            },
        }
    }

    async fn load(&self, now: DateTime<Utc>) -> Option<Snapshot> {
        let row = sqlx::query("SELECT payload FROM snapshot_slot WHERE key = ?1")
            .bind(SLOT_KEY)
            .fetch_optional(&self.pool)
            .await
            .ok()??;
        let payload: String = row.try_get("payload").ok()?;

        match decode_payload(&payload, now) {
            Decoded::Fresh(snapshot) => Some(snapshot),
            Decoded::Expired => {
                // Purge the stale slot so the next read is a plain miss.
                let _ = self.delete(SLOT_KEY).await;
                None
            }
            Decoded::Invalid => None,
        }
    }

    async fn save(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&snapshot.stamped(now))
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.upsert(SLOT_KEY, &payload)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.delete(SLOT_KEY)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteStore>();
    }
}
