use tracelens_core::{ApiError, ExperimentId};

/// Lifecycle of the bulk delete action.
///
/// `Idle -> Confirming -> InFlight -> Idle`. At most one delete is in
/// flight per grid; the variants are the mutex. Success returns to idle
/// with the selection cleared by the caller, failure returns to idle with
/// the selection left intact so the user can retry.
#[derive(Debug, Default)]
pub enum DeleteAction {
    #[default]
    Idle,
    Confirming {
        ids: Vec<ExperimentId>,
    },
    InFlight {
        count: usize,
    },
}

impl DeleteAction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self, Self::Confirming { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    pub fn pending_count(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Confirming { ids } => ids.len(),
            Self::InFlight { count } => *count,
        }
    }

    /// Opens the confirmation step. Only an idle action with a non-empty
    /// target list moves.
    pub fn begin_confirm(&mut self, ids: Vec<ExperimentId>) -> bool {
        if !self.is_idle() || ids.is_empty() {
            return false;
        }
        *self = Self::Confirming { ids };
        true
    }

    /// Dismisses the confirmation dialog without deleting.
    pub fn cancel(&mut self) -> bool {
        if !self.is_confirming() {
            return false;
        }
        *self = Self::Idle;
        true
    }

    /// Confirms: hands back the target ids and enters the in-flight state.
    pub fn commit(&mut self) -> Option<Vec<ExperimentId>> {
        let Self::Confirming { ids } = std::mem::take(self) else {
            return None;
        };
        let count = ids.len();
        *self = Self::InFlight { count };
        Some(ids)
    }

    /// Resolves the in-flight mutation either way, returning how many rows
    /// the request targeted.
    pub fn finish(&mut self) -> usize {
        let count = self.pending_count();
        *self = Self::Idle;
        count
    }
}

fn plural_suffix(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

pub fn delete_success_message(count: usize) -> String {
    let verb = if count == 1 { "has" } else { "have" };
    format!(
        "{count} experiment{} {verb} been deleted",
        plural_suffix(count)
    )
}

pub fn delete_failure_message(error: &ApiError) -> String {
    error
        .first_message()
        .map(str::to_string)
        .unwrap_or_else(|| "Failed to delete experiments".to_string())
}

pub fn confirm_title(count: usize) -> String {
    format!("Delete {count} experiment{}?", plural_suffix(count))
}

/// Shown under the confirmation title. Deletion cascades, so the copy
/// says so.
pub const CONFIRM_DETAIL: &str =
    "All runs and annotations belonging to them will be deleted as well. This cannot be undone.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::experiment_grid::pagination::PageState;
    use crate::ui::components::experiment_grid::selection::RowSelection;
    use tracelens_core::{
        DeleteExperimentsRequest, ExperimentStore, SortSpec,
    };
    use tracelens_test_support::fixtures::{experiments, page};
    use tracelens_test_support::ScriptedStore;

    fn id(s: &str) -> ExperimentId {
        ExperimentId::new(s)
    }

    #[test]
    fn delete_walks_idle_confirming_in_flight_idle() {
        let mut action = DeleteAction::default();
        assert!(action.begin_confirm(vec![id("a"), id("b")]));
        assert!(action.is_confirming());

        // Re-requesting while confirming does not restart the flow.
        assert!(!action.begin_confirm(vec![id("c")]));

        let ids = action.commit().unwrap();
        assert_eq!(ids, [id("a"), id("b")]);
        assert!(action.is_in_flight());
        assert!(action.commit().is_none());

        assert_eq!(action.finish(), 2);
        assert!(action.is_idle());
    }

    #[test]
    fn cancel_only_leaves_the_confirmation_step() {
        let mut action = DeleteAction::default();
        assert!(!action.cancel());

        action.begin_confirm(vec![id("a")]);
        assert!(action.cancel());
        assert!(action.is_idle());
    }

    #[test]
    fn empty_target_list_never_confirms() {
        let mut action = DeleteAction::default();
        assert!(!action.begin_confirm(Vec::new()));
        assert!(action.is_idle());
    }

    #[test]
    fn success_copy_pluralizes_on_count() {
        assert_eq!(delete_success_message(3), "3 experiments have been deleted");
        assert_eq!(delete_success_message(1), "1 experiment has been deleted");
    }

    #[test]
    fn failure_copy_extracts_the_first_backend_message() {
        let error = ApiError::backend(["experiment is referenced by a dataset"]);
        assert_eq!(
            delete_failure_message(&error),
            "experiment is referenced by a dataset"
        );

        let empty = ApiError::backend(Vec::<String>::new());
        assert_eq!(delete_failure_message(&empty), "Failed to delete experiments");
    }

    #[test]
    fn confirm_copy_names_the_count() {
        assert_eq!(confirm_title(1), "Delete 1 experiment?");
        assert_eq!(confirm_title(3), "Delete 3 experiments?");
    }

    #[test]
    fn confirmed_delete_clears_selection_and_resets_pages() {
        let store = ScriptedStore::new();
        store.queue_delete_ok();

        let mut pages = PageState::new(SortSpec::default());
        let ticket = pages.begin_fetch().unwrap();
        pages.apply_page(ticket.epoch, page(experiments(0, 5), Some("c5"), true));

        let mut selection = RowSelection::new();
        for row in pages.rows().iter().take(3) {
            selection.toggle(row.id.clone());
        }

        let mut action = DeleteAction::default();
        action.begin_confirm(selection.ordered_ids());
        let ids = action.commit().unwrap();

        let result = store.delete_experiments(&DeleteExperimentsRequest::new(ids));
        assert!(result.is_ok());

        let count = action.finish();
        assert_eq!(delete_success_message(count), "3 experiments have been deleted");

        // Success contract: selection empties and the grid reloads from a
        // null cursor.
        selection.clear();
        pages.reset();
        assert!(selection.is_empty());
        assert!(pages.is_empty());
        assert!(pages.begin_fetch().unwrap().request.after.is_none());
        assert_eq!(store.delete_count(), 1);
    }

    #[test]
    fn failed_delete_preserves_selection_for_retry() {
        let store = ScriptedStore::new();
        store.queue_delete_error(ApiError::transport("connection reset by peer"));

        let mut pages = PageState::new(SortSpec::default());
        let ticket = pages.begin_fetch().unwrap();
        pages.apply_page(ticket.epoch, page(experiments(0, 5), None, false));

        let mut selection = RowSelection::new();
        for row in pages.rows().iter().take(3) {
            selection.toggle(row.id.clone());
        }
        let selected_before = selection.ordered_ids();

        let mut action = DeleteAction::default();
        action.begin_confirm(selection.ordered_ids());
        let ids = action.commit().unwrap();

        let error = store
            .delete_experiments(&DeleteExperimentsRequest::new(ids))
            .unwrap_err();
        action.finish();

        // Failure contract: the dialog is gone, the message is extracted,
        // and the selection is untouched.
        assert!(action.is_idle());
        assert_eq!(delete_failure_message(&error), "connection reset by peer");
        assert_eq!(selection.ordered_ids(), selected_before);
        assert_eq!(pages.len(), 5);
    }
}
