//! Profile store on libSQL.
//!
//! Completed onboarding profiles live in the `settings` table as JSON, one
//! row per (email, key). A file-backed store is used by the service and an
//! in-memory one by tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::info;

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::Database;

/// [`Database`] backed by a single libSQL connection.
pub struct LibSqlBackend {
    // The connection is only valid while its database handle is alive.
    _db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open the profile store at `path`, creating the file and its parent
    /// directories on first use.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| DatabaseError::Pool(format!("{}: {e}", dir.display())))?;
        }

        let backend = Self::open(libsql::Builder::new_local(path).build().await).await?;
        info!(path = %path.display(), "Profile store opened");
        Ok(backend)
    }

    /// A throwaway store that disappears with the value.
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        Self::open(libsql::Builder::new_local(":memory:").build().await).await
    }

    async fn open(db: libsql::Result<LibSqlDatabase>) -> Result<Self, DatabaseError> {
        let db = db.map_err(|e| DatabaseError::Pool(format!("open profile store: {e}")))?;
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("connect to profile store: {e}")))?;
        let backend = Self {
            _db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let query_err = |e: libsql::Error| DatabaseError::Query(format!("read {key} for {user_id}: {e}"));

        let mut rows = self
            .conn()
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(query_err)?;

        let Some(row) = rows.next().await.map_err(query_err)? else {
            return Ok(None);
        };
        let raw: String = row.get(0).map_err(query_err)?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DatabaseError::Serialization(format!("{key} for {user_id}: {e}")))
    }

    async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(format!("{key} for {user_id}: {e}")))?;

        self.conn()
            .execute(
                "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![user_id, key, raw, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("write {key} for {user_id}: {e}")))?;
        Ok(())
    }
}
