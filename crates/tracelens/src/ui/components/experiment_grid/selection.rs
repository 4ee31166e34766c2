use indexmap::IndexSet;
use tracelens_core::ExperimentId;

/// The set of selected row ids, in the order they were selected.
///
/// Insertion order is the session selection order: the first entry is the
/// earliest-selected row and becomes the baseline of a compare action.
/// The set is always a subset of the ids currently loaded; callers prune
/// it whenever rows leave the page state.
#[derive(Debug, Default)]
pub struct RowSelection {
    selected: IndexSet<ExperimentId>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, id: &ExperimentId) -> bool {
        self.selected.contains(id)
    }

    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Flips membership for one row. Returns whether the row is selected
    /// afterwards.
    pub fn toggle(&mut self, id: ExperimentId) -> bool {
        if self.selected.shift_remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Header checkbox action: an empty selection becomes "all loaded
    /// rows"; any non-empty selection (full or partial) empties. This
    /// action never produces a partial selection.
    pub fn toggle_all<I>(&mut self, loaded: I)
    where
        I: IntoIterator<Item = ExperimentId>,
    {
        if self.selected.is_empty() {
            self.selected.extend(loaded);
        } else {
            self.selected.clear();
        }
    }

    /// True when every loaded row is selected (and at least one exists).
    pub fn selects_every<'a, I>(&self, loaded: I) -> bool
    where
        I: IntoIterator<Item = &'a ExperimentId>,
    {
        let mut loaded_count = 0usize;
        for id in loaded {
            if !self.selected.contains(id) {
                return false;
            }
            loaded_count += 1;
        }
        loaded_count > 0 && loaded_count == self.selected.len()
    }

    /// True when some, but not all, loaded rows are selected.
    pub fn is_indeterminate<'a, I>(&self, loaded: I) -> bool
    where
        I: IntoIterator<Item = &'a ExperimentId>,
    {
        !self.selected.is_empty() && !self.selects_every(loaded)
    }

    /// Drops every id the predicate rejects, keeping selection order for
    /// the rest. Returns whether anything was removed.
    pub fn prune<F>(&mut self, keep: F) -> bool
    where
        F: Fn(&ExperimentId) -> bool,
    {
        let before = self.selected.len();
        self.selected.retain(|id| keep(id));
        before != self.selected.len()
    }

    /// Selected ids in selection order, earliest first.
    pub fn ordered_ids(&self) -> Vec<ExperimentId> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ExperimentId {
        ExperimentId::new(s)
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = RowSelection::new();
        assert!(selection.toggle(id("a")));
        assert!(selection.contains(&id("a")));
        assert!(!selection.toggle(id("a")));
        assert!(selection.is_empty());
    }

    #[test]
    fn ordered_ids_keep_selection_order_earliest_first() {
        let mut selection = RowSelection::new();
        selection.toggle(id("c"));
        selection.toggle(id("a"));
        selection.toggle(id("b"));

        // The row selected earliest leads the compare payload.
        assert_eq!(selection.ordered_ids(), [id("c"), id("a"), id("b")]);
    }

    #[test]
    fn deselecting_a_row_keeps_the_order_of_the_rest() {
        let mut selection = RowSelection::new();
        selection.toggle(id("c"));
        selection.toggle(id("a"));
        selection.toggle(id("b"));
        selection.toggle(id("a"));

        assert_eq!(selection.ordered_ids(), [id("c"), id("b")]);
    }

    #[test]
    fn toggle_all_cycles_none_all_none() {
        let loaded = [id("a"), id("b"), id("c")];
        let mut selection = RowSelection::new();

        selection.toggle_all(loaded.iter().cloned());
        assert!(selection.selects_every(loaded.iter()));

        selection.toggle_all(loaded.iter().cloned());
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_from_partial_empties_rather_than_fills() {
        let loaded = [id("a"), id("b"), id("c")];
        let mut selection = RowSelection::new();
        selection.toggle(id("b"));
        assert!(selection.is_indeterminate(loaded.iter()));

        selection.toggle_all(loaded.iter().cloned());
        assert!(selection.is_empty());
    }

    #[test]
    fn indeterminate_is_false_when_empty_or_full() {
        let loaded = [id("a"), id("b")];
        let mut selection = RowSelection::new();
        assert!(!selection.is_indeterminate(loaded.iter()));

        selection.toggle(id("a"));
        selection.toggle(id("b"));
        assert!(!selection.is_indeterminate(loaded.iter()));
    }

    #[test]
    fn prune_enforces_the_subset_invariant() {
        let mut selection = RowSelection::new();
        selection.toggle(id("a"));
        selection.toggle(id("b"));
        selection.toggle(id("c"));

        // Ids that left the page state leave the selection.
        let loaded = [id("a"), id("c")];
        assert!(selection.prune(|sel| loaded.contains(sel)));
        assert_eq!(selection.ordered_ids(), [id("a"), id("c")]);

        assert!(!selection.prune(|sel| loaded.contains(sel)));
    }
}
