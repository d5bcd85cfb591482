//! Rank planning for manual reordering.
//!
//! A move is planned over the current display order (highest `sortOrder`
//! first). Only the span between the source and target positions is
//! renumbered, and it reuses the ranks it already occupied, so rows outside the
//! span keep their values and ranks stay unique.
//!
//! For neighbours the two ranks swap: the moved note takes the target's rank
//! and the target takes the moved note's old one. When ranks are contiguous
//! this matches nudging the target one step (`T - 1` or `T + 1`); across a
//! gap the target lands on the moved note's old rank instead.

use sqlx::FromRow;

/// A note's id paired with its `sortOrder`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Rank {
    pub id: String,
    #[sqlx(rename = "sortOrder")]
    pub sort_order: i64,
}

impl Rank {
    pub fn new(id: impl Into<String>, sort_order: i64) -> Self {
        Rank {
            id: id.into(),
            sort_order,
        }
    }
}

/// Plans the rank updates that move the note at display position `from` to
/// display position `to`.
///
/// `ranks` must be in display order. Returns only the rows whose rank
/// actually changes; an empty plan means nothing to write. Positions past the
/// end of `ranks` yield an empty plan.
pub fn plan_move(ranks: &[Rank], from: usize, to: usize) -> Vec<Rank> {
    if from == to || from >= ranks.len() || to >= ranks.len() {
        return Vec::new();
    }

    let (lo, hi) = (from.min(to), from.max(to));
    let slots: Vec<i64> = ranks[lo..=hi].iter().map(|r| r.sort_order).collect();

    let mut span: Vec<&Rank> = ranks[lo..=hi].iter().collect();
    if from < to {
        // moving down the list
        span.rotate_left(1);
    } else {
        span.rotate_right(1);
    }

    span.into_iter()
        .zip(slots)
        .filter(|(rank, slot)| rank.sort_order != *slot)
        .map(|(rank, slot)| Rank::new(rank.id.clone(), slot))
        .collect()
}
