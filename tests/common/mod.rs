#![allow(dead_code)]

use noat_core::{NoatError, Note, NoteStore, StoreConfig};

/// Routes library logs through the test harness so `--nocapture` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn memory_store() -> NoteStore {
    init_tracing();
    NoteStore::open(StoreConfig::in_memory())
}

pub fn texts(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(|n| n.text.as_str()).collect()
}

pub fn sort_orders(notes: &[Note]) -> Vec<i64> {
    notes.iter().map(|n| n.sort_order).collect()
}

/// Listed notes must be strictly descending by rank, which also means unique.
pub fn assert_strictly_descending(notes: &[Note]) {
    assert!(
        notes.windows(2).all(|w| w[0].sort_order > w[1].sort_order),
        "ranks not strictly descending: {:?}",
        sort_orders(notes)
    );
}

/// Runs a raw statement on the store's connection, e.g. to install a trigger.
pub async fn execute(store: &NoteStore, sql: &str) -> Result<(), NoatError> {
    let handle = store.connection().ensure_connected().await?;
    sqlx::query(sql)
        .execute(handle.pool())
        .await
        .map_err(NoatError::Write)?;
    Ok(())
}

/// Makes any rank update on `id` abort.
pub async fn lock_rank(store: &NoteStore, id: &str) -> Result<(), NoatError> {
    execute(
        store,
        &format!(
            "CREATE TRIGGER lock_rank BEFORE UPDATE OF sortOrder ON Note
             WHEN OLD.id = '{id}'
             BEGIN SELECT RAISE(ABORT, 'rank locked'); END"
        ),
    )
    .await
}

pub fn ranked_texts(notes: &[Note]) -> Vec<(&str, i64)> {
    notes.iter().map(|n| (n.text.as_str(), n.sort_order)).collect()
}
