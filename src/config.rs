use dirs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Where the note database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A persistent SQLite file, created on first connect if missing.
    File(PathBuf),
    /// A volatile database that disappears with the connection.
    Memory,
}

/// Settings consumed by [`ConnectionManager`](crate::connection::ConnectionManager)
/// when it establishes the connection.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub location: StoreLocation,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// A store backed by the SQLite file at `path`.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            ..Self::in_memory()
        }
    }

    /// A store that only lives as long as its connection.
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Resolves the per-user database file under `{data_local_dir}/noat/noat.db`.
    ///
    /// Returns `None` if the platform has no local data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("noat").join("noat.db"))
    }
}

impl Default for StoreConfig {
    /// Persistent file storage when a data directory exists, memory otherwise.
    fn default() -> Self {
        match Self::default_path() {
            Some(path) => Self::at(path),
            None => {
                warn!("no local data directory found, notes will not be persisted");
                Self::in_memory()
            }
        }
    }
}
