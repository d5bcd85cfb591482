//! # noat_core
//!
//! A persistent note store with user-controlled manual ordering, backed by
//! SQLite through `sqlx`.
//!
//! ## Features
//!
//! - **Lazy connection**: the database is opened and its schema declared on the
//!   first operation, exactly once, even under concurrent first use
//! - **Note CRUD**: add, edit, fetch, list and remove notes
//! - **Manual ordering**: notes are listed highest `sort_order` first and can be
//!   dragged to any position without renumbering the whole table
//! - **Atomic multi-step writes**: adding and reordering run in a single transaction
//! - **Structured logging**: operations emit `tracing` spans and events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use noat_core::{NoteStore, StoreConfig};
//!
//! # async fn run() -> noat_core::NoatResult<()> {
//! let store = NoteStore::open(StoreConfig::default());
//!
//! let groceries = store.add("groceries").await?;
//! let errands = store.add("errands").await?;
//!
//! // errands is listed first; drag groceries above it
//! store.reorder(&groceries, &errands).await?;
//!
//! for note in store.get_all().await? {
//!     println!("{}: {}", note.sort_order, note.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`config`]**: where the database lives (file or memory)
//! - **[`connection`]**: lazily established, shared connection and table handle
//! - **[`table`]**: the `Note` table's query surface
//! - **[`ordering`]**: rank planning for reorders
//! - **[`store`]**: the typed operations the UI layer calls
//! - **[`error`]**: unified error handling
//!
//! ## Error Handling
//!
//! All operations return [`NoatResult<T>`], which wraps [`NoatError`]:
//! connection failures, failed reads or writes, lookups that don't match
//! exactly one note, and reorders of a note onto itself.

pub mod config;
pub mod connection;
pub mod error;
pub mod note;
pub mod ordering;
pub mod store;
pub mod table;

/// Re-exports the most commonly used types for convenience.
pub use config::{StoreConfig, StoreLocation};
pub use connection::{ConnectionHandle, ConnectionManager, ConnectionState};
pub use error::{NoatError, NoatResult};
pub use note::Note;
pub use store::NoteStore;
