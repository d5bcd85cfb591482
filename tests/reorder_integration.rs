mod common;

use noat_core::{NoatError, Note, NoteStore};

/// Adds `texts` in order, so the last one ends up listed first.
async fn seed(store: &NoteStore, texts: &[&str]) -> Result<Vec<Note>, NoatError> {
    let mut notes = Vec::new();
    for text in texts {
        notes.push(store.add(text).await?);
    }
    Ok(notes)
}

#[tokio::test]
async fn adjacent_reorder_swaps_ranks() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["b", "a"]).await?;

    // listed as [a(2), b(1)]; drag b above a
    let listed = store.get_all().await?;
    let (a, b) = (&listed[0], &listed[1]);
    assert_eq!((a.sort_order, b.sort_order), (2, 1));

    store.reorder(b, a).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["b", "a"]);
    assert_eq!(common::sort_orders(&notes), vec![2, 1]);

    Ok(())
}

#[tokio::test]
async fn adjacent_reorder_down_swaps_ranks() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["c", "b", "a"]).await?;

    let listed = store.get_all().await?;
    store.reorder(&listed[0], &listed[1]).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["b", "a", "c"]);
    assert_eq!(common::sort_orders(&notes), vec![3, 2, 1]);

    Ok(())
}

#[tokio::test]
async fn long_move_keeps_ranks_unique() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["e", "d", "c", "b", "a"]).await?;

    // [a, b, c, d, e]: drag e to where b sits
    let listed = store.get_all().await?;
    store.reorder(&listed[4], &listed[1]).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["a", "e", "b", "c", "d"]);
    common::assert_strictly_descending(&notes);

    // a was outside the span and keeps its rank
    assert_eq!(notes[0].sort_order, 5);

    Ok(())
}

#[tokio::test]
async fn long_move_down_across_a_gap() -> Result<(), NoatError> {
    let store = common::memory_store();
    let seeded = seed(&store, &["d", "c", "b", "a"]).await?;

    // leaves ranks {4, 3, 1}
    store.remove(&seeded[1].id).await?;

    let listed = store.get_all().await?;
    assert_eq!(common::texts(&listed), vec!["a", "b", "d"]);

    store.reorder(&listed[0], &listed[2]).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["b", "d", "a"]);
    assert_eq!(common::sort_orders(&notes), vec![4, 3, 1]);

    Ok(())
}

#[tokio::test]
async fn failed_reorder_rolls_back_every_rank() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["b", "a"]).await?;

    // b is written first and succeeds, then a's update aborts
    let listed = store.get_all().await?;
    common::lock_rank(&store, &listed[0].id).await?;

    let result = store.reorder(&listed[1], &listed[0]).await;
    assert!(matches!(result, Err(NoatError::Write(_))));

    let after = store.get_all().await?;
    assert_eq!(common::ranked_texts(&after), vec![("a", 2), ("b", 1)]);

    // the connection is usable afterwards
    assert_eq!(store.add("c").await?.sort_order, 3);

    Ok(())
}

#[tokio::test]
async fn failed_move_rolls_back_every_rank() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["c", "b", "a"]).await?;

    // moving a to the bottom rewrites b, then c, then a
    let listed = store.get_all().await?;
    common::lock_rank(&store, &listed[2].id).await?;

    let result = store.move_to(&listed[0].id, 2).await;
    assert!(matches!(result, Err(NoatError::Write(_))));

    let after = store.get_all().await?;
    assert_eq!(common::ranked_texts(&after), vec![("a", 3), ("b", 2), ("c", 1)]);

    Ok(())
}

#[tokio::test]
async fn reorder_onto_itself_is_rejected() -> Result<(), NoatError> {
    let store = common::memory_store();
    let note = store.add("solo").await?;

    let result = store.reorder(&note, &note).await;
    assert!(matches!(result, Err(NoatError::InvalidReorder(_))));

    let after = store.get_by_id(&note.id).await?;
    assert_eq!(after.sort_order, 1);

    Ok(())
}

#[tokio::test]
async fn reorder_with_removed_note_is_not_found() -> Result<(), NoatError> {
    let store = common::memory_store();
    let seeded = seed(&store, &["b", "a"]).await?;

    store.remove(&seeded[0].id).await?;

    let result = store.reorder(&seeded[1], &seeded[0]).await;
    match result {
        Err(NoatError::NotFound(id)) => assert_eq!(id, seeded[0].id),
        other => panic!("expected NotFound, got {other:?}"),
    }

    // the surviving note is untouched
    let survivor = store.get_by_id(&seeded[1].id).await?;
    assert_eq!(survivor.sort_order, 2);

    Ok(())
}

#[tokio::test]
async fn reorder_from_stale_snapshots_uses_stored_positions() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["c", "b", "a"]).await?;

    let stale = store.get_all().await?;
    store.reorder(&stale[2], &stale[1]).await?;
    // [a, c, b] now; the old snapshots still carry the old ranks
    store.reorder(&stale[2], &stale[0]).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["c", "a", "b"]);
    common::assert_strictly_descending(&notes);

    Ok(())
}

#[tokio::test]
async fn reorder_leaves_text_and_dates_alone() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["b", "a"]).await?;

    let before = store.get_all().await?;
    store.reorder(&before[1], &before[0]).await?;
    let after = store.get_all().await?;

    assert_eq!(after[0].id, before[1].id);
    assert_eq!(after[0].text, before[1].text);
    assert_eq!(after[0].date_created, before[1].date_created);
    assert_eq!(after[0].date_updated, before[1].date_updated);

    Ok(())
}

#[tokio::test]
async fn move_to_position() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["d", "c", "b", "a"]).await?;

    let listed = store.get_all().await?;
    store.move_to(&listed[0].id, 2).await?;

    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["b", "c", "a", "d"]);
    assert_eq!(common::sort_orders(&notes), vec![4, 3, 2, 1]);

    // positions past the end land at the bottom
    store.move_to(&listed[1].id, 99).await?;
    let notes = store.get_all().await?;
    assert_eq!(common::texts(&notes), vec!["c", "a", "d", "b"]);

    // moving to its own position writes nothing
    store.move_to(&listed[2].id, 0).await?;
    assert_eq!(common::texts(&store.get_all().await?), vec!["c", "a", "d", "b"]);

    Ok(())
}

#[tokio::test]
async fn move_to_unknown_id_is_not_found() -> Result<(), NoatError> {
    let store = common::memory_store();
    store.add("only").await?;

    assert!(matches!(
        store.move_to("nonexistent", 0).await,
        Err(NoatError::NotFound(_))
    ));

    Ok(())
}

#[tokio::test]
async fn ranks_stay_unique_through_mixed_operations() -> Result<(), NoatError> {
    let store = common::memory_store();
    seed(&store, &["1", "2", "3", "4", "5", "6"]).await?;

    let moves: [(usize, usize); 6] = [(5, 0), (0, 3), (2, 4), (1, 0), (4, 1), (3, 2)];
    for (step, (from, to)) in moves.into_iter().enumerate() {
        let listed = store.get_all().await?;
        store.reorder(&listed[from], &listed[to]).await?;

        if step == 2 {
            let listed = store.get_all().await?;
            store.remove(&listed[3].id).await?;
            store.add("late").await?;
        }

        let notes = store.get_all().await?;
        assert_eq!(notes.len(), 6);
        common::assert_strictly_descending(&notes);
    }

    Ok(())
}
