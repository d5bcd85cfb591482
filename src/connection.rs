use crate::config::{StoreConfig, StoreLocation};
use crate::error::{NoatError, NoatResult};
use crate::table::NoteTable;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Lifecycle of a [`ConnectionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Nothing opened yet, or the last attempt failed.
    Uninitialized,
    /// An establishment is in flight; other callers wait on it.
    Connecting,
    /// The handle exists and is returned as is from now on.
    Ready,
}

/// The open database plus the resolved `Note` table.
///
/// Only built inside [`ConnectionManager::ensure_connected`] and never mutated
/// afterwards.
#[derive(Debug)]
pub struct ConnectionHandle {
    pool: SqlitePool,
    notes: NoteTable,
}

impl ConnectionHandle {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn notes(&self) -> &NoteTable {
        &self.notes
    }
}

/// Owns the single lazily established connection shared by every caller.
///
/// Concurrent calls to [`ensure_connected`](Self::ensure_connected) made before
/// the first one finishes wait on the same establishment instead of opening
/// their own connection. A failed establishment leaves the manager
/// uninitialized so the next call tries again.
#[derive(Debug)]
pub struct ConnectionManager {
    config: StoreConfig,
    handle: OnceCell<ConnectionHandle>,
    connecting: AtomicBool,
    attempts: AtomicUsize,
}

/// Clears the connecting flag even if the establishing future is dropped.
struct ConnectingGuard<'a>(&'a AtomicBool);

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ConnectionManager {
    pub fn new(config: StoreConfig) -> Self {
        ConnectionManager {
            config,
            handle: OnceCell::new(),
            connecting: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        if self.handle.initialized() {
            ConnectionState::Ready
        } else if self.connecting.load(Ordering::SeqCst) {
            ConnectionState::Connecting
        } else {
            ConnectionState::Uninitialized
        }
    }

    /// How many times establishment has actually run, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Returns the ready handle, establishing the connection on first use.
    ///
    /// # Errors
    /// Returns [`NoatError::Connection`] if the database cannot be opened or the
    /// schema cannot be declared.
    pub async fn ensure_connected(&self) -> NoatResult<&ConnectionHandle> {
        if let Some(handle) = self.handle.get() {
            return Ok(handle);
        }

        self.handle.get_or_try_init(|| self.establish()).await
    }

    #[instrument(skip(self), fields(location = ?self.config.location))]
    async fn establish(&self) -> NoatResult<ConnectionHandle> {
        self.connecting.store(true, Ordering::SeqCst);
        let _guard = ConnectingGuard(&self.connecting);
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let options = match &self.config.location {
            StoreLocation::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| NoatError::Connection(sqlx::Error::Io(e)))?;
                }

                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
            }
            StoreLocation::Memory => {
                SqliteConnectOptions::from_str("sqlite::memory:").map_err(NoatError::Connection)?
            }
        }
        .busy_timeout(self.config.busy_timeout);

        // One connection for the life of the manager; an idle in-memory
        // connection must never be reaped or the data goes with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(NoatError::Connection)?;

        NoteTable::declare(&pool).await?;
        let notes = NoteTable::resolve(&pool).await?;
        debug!(table = notes.name(), "resolved table handle");

        info!("note store connected");
        Ok(ConnectionHandle { pool, notes })
    }
}
