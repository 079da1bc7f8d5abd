//! Schema upgrades for the profile store.
//!
//! The schema is a list of numbered steps. The highest number that has been
//! applied is kept in `schema_history`; opening a store applies whatever is
//! newer than that, in order.

use libsql::{Connection, params};
use tracing::{debug, info};

use crate::error::DatabaseError;

struct SchemaStep {
    version: i64,
    label: &'static str,
    sql: &'static str,
}

/// Ordered by version. Append only.
static SCHEMA: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "settings",
    sql: r#"
            CREATE TABLE IF NOT EXISTS settings (
                user_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (user_id, key)
            );
        "#,
}];

const CREATE_HISTORY: &str = "CREATE TABLE IF NOT EXISTS schema_history (
    version INTEGER PRIMARY KEY,
    label TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// Bring the schema behind `conn` up to the latest version.
pub async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute(CREATE_HISTORY, ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("schema_history: {e}")))?;

    let applied = schema_version(conn).await?;
    let pending = SCHEMA.iter().filter(|step| step.version > applied);

    let mut version = applied;
    for step in pending {
        info!(version = step.version, label = step.label, "Upgrading profile store schema");
        conn.execute_batch(step.sql).await.map_err(|e| {
            DatabaseError::Migration(format!("schema step {} '{}': {e}", step.version, step.label))
        })?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_history (version, label) VALUES (?1, ?2)",
            params![step.version, step.label],
        )
        .await
        .map_err(|e| DatabaseError::Migration(format!("recording schema step {}: {e}", step.version)))?;
        version = step.version;
    }

    debug!(version, "Profile store schema up to date");
    Ok(())
}

/// Highest recorded schema version, 0 for a fresh database.
async fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_history", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("schema version: {e}")))?;

    let Some(row) = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("schema version: {e}")))?
    else {
        return Ok(0);
    };
    row.get::<i64>(0)
        .map_err(|e| DatabaseError::Migration(format!("schema version: {e}")))
}
