use crate::error::{NoatError, NoatResult};
use crate::note::Note;
use crate::ordering::Rank;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

/// Bumped whenever the `Note` layout changes.
pub const SCHEMA_VERSION: i64 = 1;

const TABLE_NAME: &str = "Note";

/// Resolved handle to the `Note` table.
///
/// Every query runs on a borrowed connection, so the same handle works against
/// a pooled connection or an open transaction (`&mut *tx`).
#[derive(Debug, Clone)]
pub struct NoteTable {
    name: String,
}

impl NoteTable {
    /// Declares the `Note` table and its `text` index if they don't exist yet.
    pub(crate) async fn declare(pool: &SqlitePool) -> NoatResult<()> {
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (
                id TEXT PRIMARY KEY NOT NULL,
                text TEXT NOT NULL,
                sortOrder INTEGER NOT NULL,
                dateCreated TEXT NOT NULL,
                dateUpdated TEXT NOT NULL
            )"
        ))
        .execute(pool)
        .await
        .map_err(NoatError::Connection)?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_text ON {TABLE_NAME} (text)"
        ))
        .execute(pool)
        .await
        .map_err(NoatError::Connection)?;

        sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(pool)
            .await
            .map_err(NoatError::Connection)?;

        Ok(())
    }

    /// Looks the table up in the catalog and returns a handle to it.
    pub(crate) async fn resolve(pool: &SqlitePool) -> NoatResult<Self> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(TABLE_NAME)
                .fetch_optional(pool)
                .await
                .map_err(NoatError::Connection)?;

        match name {
            Some(name) => Ok(NoteTable { name }),
            None => Err(NoatError::Connection(sqlx::Error::Protocol(format!(
                "table {TABLE_NAME} missing after schema declaration"
            )))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `MAX(sortOrder)` over all rows, `None` for an empty table.
    pub async fn max_sort_order(&self, conn: &mut SqliteConnection) -> NoatResult<Option<i64>> {
        sqlx::query_scalar(&format!("SELECT MAX(sortOrder) FROM {}", self.name))
            .fetch_one(conn)
            .await
            .map_err(NoatError::Read)
    }

    pub async fn count(&self, conn: &mut SqliteConnection) -> NoatResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", self.name))
            .fetch_one(conn)
            .await
            .map_err(NoatError::Read)?;

        Ok(count as u64)
    }

    /// Every row, highest `sortOrder` first.
    pub async fn select_all(&self, conn: &mut SqliteConnection) -> NoatResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT id, text, sortOrder, dateCreated, dateUpdated
             FROM {} ORDER BY sortOrder DESC",
            self.name
        ))
        .fetch_all(conn)
        .await
        .map_err(NoatError::Read)
    }

    /// All rows whose id equals `id`; callers decide what a count other than one means.
    pub async fn select_by_id(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> NoatResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT id, text, sortOrder, dateCreated, dateUpdated
             FROM {} WHERE id = ?",
            self.name
        ))
        .bind(id)
        .fetch_all(conn)
        .await
        .map_err(NoatError::Read)
    }

    /// Ids and ranks only, in display order.
    pub async fn select_ranks(&self, conn: &mut SqliteConnection) -> NoatResult<Vec<Rank>> {
        sqlx::query_as::<_, Rank>(&format!(
            "SELECT id, sortOrder FROM {} ORDER BY sortOrder DESC",
            self.name
        ))
        .fetch_all(conn)
        .await
        .map_err(NoatError::Read)
    }

    pub async fn insert_or_replace(
        &self,
        conn: &mut SqliteConnection,
        note: &Note,
    ) -> NoatResult<()> {
        sqlx::query(&format!(
            "INSERT OR REPLACE INTO {} (id, text, sortOrder, dateCreated, dateUpdated)
             VALUES (?, ?, ?, ?, ?)",
            self.name
        ))
        .bind(&note.id)
        .bind(&note.text)
        .bind(note.sort_order)
        .bind(note.date_created)
        .bind(note.date_updated)
        .execute(conn)
        .await
        .map_err(NoatError::Write)?;

        Ok(())
    }

    /// Sets `text` and `dateUpdated`, returning the number of rows touched.
    pub async fn update_text(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        text: &str,
        updated: DateTime<Utc>,
    ) -> NoatResult<u64> {
        let res = sqlx::query(&format!(
            "UPDATE {} SET text = ?, dateUpdated = ? WHERE id = ?",
            self.name
        ))
        .bind(text)
        .bind(updated)
        .bind(id)
        .execute(conn)
        .await
        .map_err(NoatError::Write)?;

        Ok(res.rows_affected())
    }

    pub async fn update_sort_order(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        sort_order: i64,
    ) -> NoatResult<u64> {
        let res = sqlx::query(&format!(
            "UPDATE {} SET sortOrder = ? WHERE id = ?",
            self.name
        ))
        .bind(sort_order)
        .bind(id)
        .execute(conn)
        .await
        .map_err(NoatError::Write)?;

        Ok(res.rows_affected())
    }

    pub async fn delete(&self, conn: &mut SqliteConnection, id: &str) -> NoatResult<u64> {
        let res = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.name))
            .bind(id)
            .execute(conn)
            .await
            .map_err(NoatError::Write)?;

        Ok(res.rows_affected())
    }
}
