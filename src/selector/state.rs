use crate::model::{Selectable, SelectionMode};
use tracing::debug;

/// Open/closed dialog state with the pending selection that only lives while open.
///
/// `pending_ids` and `pending_rows` always come from the same selection event;
/// they are never re-derived from each other.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorState<T> {
    Closed,
    Open {
        pending_ids: Vec<i64>,
        pending_rows: Vec<T>,
    },
}

impl<T> Default for SelectorState<T> {
    fn default() -> Self {
        SelectorState::Closed
    }
}

impl<T: Selectable> SelectorState<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, SelectorState::Open { .. })
    }

    /// Closed → Open. Ids are re-seeded from `initial_ids`, rows start empty,
    /// whatever the previous session left behind. Single mode keeps the last
    /// seeded id only, same as `apply_change`.
    pub fn open(&mut self, mode: SelectionMode, initial_ids: &[i64]) {
        let pending_ids = match mode {
            SelectionMode::Multiple => initial_ids.to_vec(),
            SelectionMode::Single => initial_ids.last().copied().into_iter().collect(),
        };
        *self = SelectorState::Open {
            pending_ids,
            pending_rows: Vec::new(),
        };
    }

    /// Store a row-selection event verbatim. Ignored while closed.
    ///
    /// In single mode only the last id (and its row) survives, so the pending
    /// list never grows past one entry.
    pub fn apply_change(&mut self, mode: SelectionMode, ids: Vec<i64>, rows: Vec<T>) {
        let SelectorState::Open {
            pending_ids,
            pending_rows,
        } = self
        else {
            return;
        };

        match mode {
            SelectionMode::Multiple => {
                *pending_ids = ids;
                *pending_rows = rows;
            }
            SelectionMode::Single => {
                let last = ids.last().copied();
                *pending_ids = last.into_iter().collect();
                *pending_rows = rows
                    .into_iter()
                    .filter(|row| Some(row.id()) == last)
                    .take(1)
                    .collect();
            }
        }
        debug!(pending = pending_ids.len(), "pending selection changed");
    }

    pub fn pending_ids(&self) -> &[i64] {
        match self {
            SelectorState::Open { pending_ids, .. } => pending_ids,
            SelectorState::Closed => &[],
        }
    }

    pub fn pending_rows(&self) -> &[T] {
        match self {
            SelectorState::Open { pending_rows, .. } => pending_rows,
            SelectorState::Closed => &[],
        }
    }

    /// Confirm is only reachable with at least one pending id.
    pub fn can_confirm(&self) -> bool {
        !self.pending_ids().is_empty()
    }

    /// Open → Closed, handing back the pending payload untouched.
    /// Returns `None` and changes nothing when confirm is not allowed.
    pub fn confirm(&mut self) -> Option<(Vec<i64>, Vec<T>)> {
        if !self.can_confirm() {
            return None;
        }
        match std::mem::replace(self, SelectorState::Closed) {
            SelectorState::Open {
                pending_ids,
                pending_rows,
            } => Some((pending_ids, pending_rows)),
            SelectorState::Closed => None,
        }
    }

    /// Open → Closed, pending state discarded.
    pub fn cancel(&mut self) {
        *self = SelectorState::Closed;
    }
}

/// Running count shown in the dialog footer. The noun follows the mode, not the
/// number: single mode always reads "seleccionado".
pub fn count_label(mode: SelectionMode, count: usize) -> String {
    match mode {
        SelectionMode::Single => format!("{count} seleccionado"),
        SelectionMode::Multiple => format!("{count} seleccionados"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;

    fn label(id: i64) -> Label {
        Label {
            id,
            name: format!("label-{id}"),
            name_eng: format!("tag-{id}"),
        }
    }

    #[test]
    fn single_mode_never_holds_more_than_one_id() {
        let events: Vec<Vec<i64>> = vec![vec![1], vec![1, 2], vec![], vec![3, 4, 5], vec![6]];
        let mut state = SelectorState::<Label>::Closed;
        state.open(SelectionMode::Multiple, &[]);
        for ids in events {
            let rows = ids.iter().map(|&id| label(id)).collect();
            state.apply_change(SelectionMode::Single, ids.clone(), rows);
            assert!(state.pending_ids().len() <= 1, "after event {ids:?}");
            assert!(state.pending_rows().len() <= 1);
        }
        assert_eq!(state.pending_ids(), &[6]);
        assert_eq!(state.pending_rows(), &[label(6)]);
    }

    #[test]
    fn single_mode_seeded_with_several_ids_keeps_the_last() {
        let mut state = SelectorState::<Label>::Closed;
        state.open(SelectionMode::Single, &[1, 2]);
        assert_eq!(state.pending_ids(), &[2]);
        assert!(state.pending_rows().is_empty());
        assert_eq!(
            count_label(SelectionMode::Single, state.pending_ids().len()),
            "1 seleccionado"
        );
        assert_eq!(state.confirm(), Some((vec![2], Vec::new())));
    }

    #[test]
    fn open_reseeds_ids_and_clears_rows_every_time() {
        let mut state = SelectorState::<Label>::Closed;
        state.open(SelectionMode::Multiple, &[2, 1]);
        state.apply_change(SelectionMode::Multiple, vec![7, 8], vec![label(7), label(8)]);
        state.cancel();

        state.open(SelectionMode::Multiple, &[2, 1]);
        let mut ids = state.pending_ids().to_vec();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
        assert!(state.pending_rows().is_empty());

        // Reopening while already open also resets.
        state.apply_change(SelectionMode::Multiple, vec![9], vec![label(9)]);
        state.open(SelectionMode::Multiple, &[]);
        assert!(state.pending_ids().is_empty());
        assert!(state.pending_rows().is_empty());
    }

    #[test]
    fn confirm_passes_payload_through_and_closes() {
        let mut state = SelectorState::<Label>::Closed;
        state.open(SelectionMode::Multiple, &[]);
        state.apply_change(SelectionMode::Multiple, vec![3], vec![label(3)]);
        assert_eq!(state.confirm(), Some((vec![3], vec![label(3)])));
        assert!(!state.is_open());
    }

    #[test]
    fn confirm_is_gated_on_a_non_empty_selection() {
        let mut state = SelectorState::<Label>::Closed;
        assert!(!state.can_confirm());
        state.open(SelectionMode::Multiple, &[]);
        assert!(!state.can_confirm());
        assert_eq!(state.confirm(), None);
        assert!(state.is_open());

        state.apply_change(SelectionMode::Multiple, vec![5], vec![label(5)]);
        assert!(state.can_confirm());
    }

    #[test]
    fn changes_while_closed_are_ignored() {
        let mut state = SelectorState::<Label>::Closed;
        state.apply_change(SelectionMode::Multiple, vec![1], vec![label(1)]);
        assert_eq!(state, SelectorState::Closed);
    }

    #[test]
    fn count_label_wording_follows_mode() {
        assert_eq!(count_label(SelectionMode::Multiple, 2), "2 seleccionados");
        assert_eq!(count_label(SelectionMode::Single, 1), "1 seleccionado");
        assert_eq!(count_label(SelectionMode::Single, 0), "0 seleccionado");
        assert_eq!(count_label(SelectionMode::Multiple, 1), "1 seleccionados");
    }
}
