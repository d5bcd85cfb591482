use crate::config::StoreConfig;
use crate::connection::ConnectionManager;
use crate::error::{NoatError, NoatResult};
use crate::note::Note;
use crate::ordering::{Rank, plan_move};
use crate::table::NoteTable;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Typed note operations over a shared [`ConnectionManager`].
///
/// Cloning is cheap; clones share the same connection.
#[derive(Debug, Clone)]
pub struct NoteStore {
    connection: Arc<ConnectionManager>,
}

impl NoteStore {
    /// Creates a store over an existing manager.
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        NoteStore { connection }
    }

    /// Creates a store with its own manager for `config`.
    ///
    /// Nothing is opened until the first operation runs.
    pub fn open(config: StoreConfig) -> Self {
        Self::new(Arc::new(ConnectionManager::new(config)))
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Adds a note ranked above every existing note.
    ///
    /// The max-rank read and the insert share one transaction. The first note
    /// in an empty store gets rank 1.
    ///
    /// # Errors
    /// Returns [`NoatError::Write`] if the insert or commit fails.
    #[instrument(skip(self, text))]
    pub async fn add(&self, text: &str) -> NoatResult<Note> {
        let handle = self.connection.ensure_connected().await?;
        let mut tx = handle.pool().begin().await.map_err(NoatError::Write)?;

        let max = handle.notes().max_sort_order(&mut tx).await?;
        let note = Note::new(text, max.unwrap_or(0) + 1);
        handle.notes().insert_or_replace(&mut tx, &note).await?;

        tx.commit().await.map_err(NoatError::Write)?;

        debug!(id = %note.id, sort_order = note.sort_order, "added note");
        Ok(note)
    }

    /// Replaces a note's text and bumps `date_updated`.
    ///
    /// `date_updated` never goes below the stored `date_created`, even if the
    /// clock has stepped backwards since creation.
    /// Succeeds without writing anything if no note has `id`.
    #[instrument(skip(self, text))]
    pub async fn edit(&self, id: &str, text: &str) -> NoatResult<()> {
        let handle = self.connection.ensure_connected().await?;
        let mut tx = handle.pool().begin().await.map_err(NoatError::Write)?;

        let Some(current) = handle.notes().select_by_id(&mut tx, id).await?.pop() else {
            debug!("no note to edit");
            return Ok(());
        };

        let updated = Utc::now().max(current.date_created);
        handle
            .notes()
            .update_text(&mut tx, id, text, updated)
            .await?;

        tx.commit().await.map_err(NoatError::Write)?;
        Ok(())
    }

    /// Every note, highest rank first.
    pub async fn get_all(&self) -> NoatResult<Vec<Note>> {
        let handle = self.connection.ensure_connected().await?;
        let mut conn = handle.pool().acquire().await.map_err(NoatError::Read)?;

        handle.notes().select_all(&mut conn).await
    }

    /// Fetches exactly one note by id.
    ///
    /// # Errors
    /// Returns [`NoatError::NotFound`] when zero or several rows match.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> NoatResult<Note> {
        let handle = self.connection.ensure_connected().await?;
        let mut conn = handle.pool().acquire().await.map_err(NoatError::Read)?;

        let mut matches = handle.notes().select_by_id(&mut conn, id).await?;
        match matches.len() {
            1 => Ok(matches.remove(0)),
            n => {
                debug!(matches = n, "lookup did not match a single note");
                Err(NoatError::NotFound(id.to_string()))
            }
        }
    }

    /// Deletes a note. Other notes keep their ranks, leaving a gap.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> NoatResult<()> {
        let handle = self.connection.ensure_connected().await?;
        let mut conn = handle.pool().acquire().await.map_err(NoatError::Write)?;

        if handle.notes().delete(&mut conn, id).await? == 0 {
            debug!("no note to remove");
        }
        Ok(())
    }

    pub async fn count(&self) -> NoatResult<u64> {
        let handle = self.connection.ensure_connected().await?;
        let mut conn = handle.pool().acquire().await.map_err(NoatError::Read)?;

        handle.notes().count(&mut conn).await
    }

    /// Moves `from_note` into `to_note`'s display position.
    ///
    /// For neighbours the two ranks swap. For longer moves the notes in
    /// between shift one place towards `from_note`'s old position. Positions
    /// come from the table as it is now, not from the snapshots' ranks.
    /// All rank updates commit together or not at all.
    ///
    /// # Errors
    /// - [`NoatError::InvalidReorder`] if both snapshots are the same note
    /// - [`NoatError::NotFound`] if either note no longer exists
    /// - [`NoatError::Write`] if an update or the commit fails
    #[instrument(skip_all, fields(from = %from_note.id, to = %to_note.id))]
    pub async fn reorder(&self, from_note: &Note, to_note: &Note) -> NoatResult<()> {
        if from_note.id == to_note.id {
            return Err(NoatError::InvalidReorder(format!(
                "note {} cannot be moved onto itself",
                from_note.id
            )));
        }

        let handle = self.connection.ensure_connected().await?;
        let mut tx = handle.pool().begin().await.map_err(NoatError::Write)?;

        let ranks = handle.notes().select_ranks(&mut tx).await?;
        let from = position_of(&ranks, &from_note.id)?;
        let to = position_of(&ranks, &to_note.id)?;

        if ranks[from].sort_order != from_note.sort_order || ranks[to].sort_order != to_note.sort_order
        {
            debug!("reordering from stale snapshots, using stored ranks");
        }

        let plan = plan_move(&ranks, from, to);
        write_ranks(handle.notes(), &mut tx, &plan).await?;

        tx.commit().await.map_err(NoatError::Write)?;

        debug!(updated = plan.len(), "reordered notes");
        Ok(())
    }

    /// Moves a note to a zero-based display position, clamped to the list.
    ///
    /// This is the index form of [`reorder`](Self::reorder): moving to the
    /// position another note holds is the same as reordering onto that note.
    #[instrument(skip(self))]
    pub async fn move_to(&self, id: &str, position: usize) -> NoatResult<()> {
        let handle = self.connection.ensure_connected().await?;
        let mut tx = handle.pool().begin().await.map_err(NoatError::Write)?;

        let ranks = handle.notes().select_ranks(&mut tx).await?;
        let from = position_of(&ranks, id)?;
        let to = position.min(ranks.len() - 1);

        let plan = plan_move(&ranks, from, to);
        write_ranks(handle.notes(), &mut tx, &plan).await?;

        tx.commit().await.map_err(NoatError::Write)?;

        debug!(updated = plan.len(), "moved note");
        Ok(())
    }
}

async fn write_ranks(
    notes: &NoteTable,
    conn: &mut SqliteConnection,
    plan: &[Rank],
) -> NoatResult<()> {
    for rank in plan {
        notes.update_sort_order(conn, &rank.id, rank.sort_order).await?;
    }
    Ok(())
}

fn position_of(ranks: &[Rank], id: &str) -> NoatResult<usize> {
    ranks
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| NoatError::NotFound(id.to_string()))
}
