//! The in-memory store of fetched action history.

use crate::models::Action;

/// Accumulates action batches as window fetches complete.
///
/// Append-only; sealing it with [`ActionStore::freeze`] is the only way to
/// read it back out.
#[derive(Debug, Default)]
pub struct ActionStore {
    actions: Vec<Action>,
}

impl ActionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, batch: Vec<Action>) {
        self.actions.extend(batch);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Seal the store once fetching is complete.
    ///
    /// The sort is stable, so actions sharing a timestamp keep their
    /// fetch-arrival order.
    pub fn freeze(mut self) -> FrozenActions {
        self.actions.sort_by(|a, b| b.date.cmp(&a.date));
        FrozenActions {
            actions: self.actions,
        }
    }
}

/// The sealed, most-recent-first action history for a whole run. Read-only;
/// shared by every board's render.
#[derive(Debug)]
pub struct FrozenActions {
    actions: Vec<Action>,
}

impl FrozenActions {
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
