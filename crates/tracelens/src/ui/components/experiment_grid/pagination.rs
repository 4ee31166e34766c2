use std::sync::Arc;

use tracelens_core::{Cursor, ExperimentId, ExperimentPage, ExperimentRow, PageRequest, SortSpec};

use super::theme::{FETCH_THRESHOLD, PAGE_SIZE};

/// Handed out by [`PageState::begin_fetch`]; the completion must present
/// it back so resolutions from before a reset are discarded.
#[derive(Debug)]
pub struct FetchTicket {
    pub request: PageRequest,
    pub epoch: u64,
}

/// The growing row list and its continuation cursor.
///
/// Rows live behind an `Arc` that is replaced wholesale on every append or
/// reset; downstream caches key off the pointer identity to know when to
/// re-derive.
pub struct PageState {
    rows: Arc<Vec<ExperimentRow>>,
    cursor: Option<Cursor>,
    has_more: bool,
    is_fetching: bool,
    epoch: u64,
    sort: SortSpec,
}

impl PageState {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            cursor: None,
            has_more: true,
            is_fetching: false,
            epoch: 0,
            sort,
        }
    }

    pub fn rows(&self) -> &Arc<Vec<ExperimentRow>> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn ids(&self) -> impl Iterator<Item = &ExperimentId> {
        self.rows.iter().map(|row| &row.id)
    }

    pub fn contains(&self, id: &ExperimentId) -> bool {
        self.rows.iter().any(|row| &row.id == id)
    }

    /// True when a completion carrying this epoch is still current.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Claims the in-flight slot and builds the next page request.
    ///
    /// Returns `None` while a fetch is in flight or once the backend
    /// reported the last page; a rejected call has no effect (the caller
    /// is not queued).
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.is_fetching || !self.has_more {
            return None;
        }
        self.is_fetching = true;

        let mut request = PageRequest::first_page(PAGE_SIZE, self.sort);
        if let Some(cursor) = &self.cursor {
            request = request.after(cursor.clone());
        }

        Some(FetchTicket {
            request,
            epoch: self.epoch,
        })
    }

    /// Appends a fetched page in response order and advances the cursor.
    /// Stale completions (epoch mismatch after a reset) are dropped; the
    /// return value reports whether the page was applied.
    pub fn apply_page(&mut self, epoch: u64, page: ExperimentPage) -> bool {
        if !self.is_current(epoch) {
            return false;
        }
        self.is_fetching = false;
        self.cursor = page.page_info.end_cursor;
        self.has_more = page.page_info.has_next_page;

        let mut rows = Vec::with_capacity(self.rows.len() + page.edges.len());
        rows.extend(self.rows.iter().cloned());
        rows.extend(page.edges.into_iter().map(|edge| edge.node));
        self.rows = Arc::new(rows);
        true
    }

    /// Releases the in-flight slot after a failed fetch. Rows, cursor, and
    /// `has_more` keep their last known values so a later scroll retries.
    pub fn fail_fetch(&mut self, epoch: u64) {
        if self.is_current(epoch) {
            self.is_fetching = false;
        }
    }

    /// Drops all rows and the cursor and invalidates any in-flight fetch.
    /// The caller follows up with the first fetch of the fresh sequence.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.rows = Arc::new(Vec::new());
        self.cursor = None;
        self.has_more = true;
        self.is_fetching = false;
    }

    /// Scroll-trigger policy: fetch when the viewport bottom is within
    /// [`FETCH_THRESHOLD`] pixels of the loaded content's end.
    pub fn should_fetch(&self, distance_to_bottom: f32) -> bool {
        distance_to_bottom < FETCH_THRESHOLD && self.has_more && !self.is_fetching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_core::ExperimentStore;
    use tracelens_test_support::fixtures::{experiments, page};
    use tracelens_test_support::ScriptedStore;

    fn fresh() -> PageState {
        PageState::new(SortSpec::default())
    }

    #[test]
    fn begin_fetch_is_idempotent_while_in_flight() {
        let mut pages = fresh();

        let ticket = pages.begin_fetch().expect("first fetch starts");
        assert!(ticket.request.after.is_none());
        assert_eq!(ticket.request.first, PAGE_SIZE);

        // A second call while fetching issues nothing and queues nothing.
        assert!(pages.begin_fetch().is_none());

        pages.apply_page(ticket.epoch, page(experiments(0, 3), Some("c3"), true));
        assert!(!pages.is_fetching());
        assert!(pages.begin_fetch().is_some());
    }

    #[test]
    fn pages_append_in_completion_order() {
        let mut pages = fresh();

        let t1 = pages.begin_fetch().unwrap();
        pages.apply_page(t1.epoch, page(experiments(0, 2), Some("c2"), true));

        let t2 = pages.begin_fetch().unwrap();
        assert_eq!(t2.request.after.as_ref().unwrap().as_str(), "c2");
        pages.apply_page(t2.epoch, page(experiments(2, 2), None, false));

        // The row list is the concatenation of the pages, in fetch order.
        let names: Vec<_> = pages.rows().iter().map(|r| r.sequence_number).collect();
        assert_eq!(names, [0, 1, 2, 3]);
        assert!(!pages.has_more());
        assert!(pages.begin_fetch().is_none());
    }

    #[test]
    fn failed_fetch_keeps_rows_and_allows_retry() {
        let mut pages = fresh();

        let t1 = pages.begin_fetch().unwrap();
        pages.apply_page(t1.epoch, page(experiments(0, 2), Some("c2"), true));

        let t2 = pages.begin_fetch().unwrap();
        pages.fail_fetch(t2.epoch);

        assert_eq!(pages.len(), 2);
        assert!(pages.has_more());
        assert!(pages.should_fetch(100.0));
    }

    #[test]
    fn stale_completion_after_reset_is_discarded() {
        let mut pages = fresh();

        let ticket = pages.begin_fetch().unwrap();
        pages.reset();

        assert!(!pages.apply_page(ticket.epoch, page(experiments(0, 2), None, false)));
        assert!(pages.is_empty());
        assert!(!pages.is_fetching());
    }

    #[test]
    fn threshold_policy_requires_headroom_more_pages_and_idle_fetch() {
        let mut pages = fresh();

        assert!(pages.should_fetch(299.0));
        assert!(!pages.should_fetch(300.0));

        let ticket = pages.begin_fetch().unwrap();
        assert!(!pages.should_fetch(0.0));
        pages.apply_page(ticket.epoch, page(experiments(0, 1), None, false));
        assert!(!pages.should_fetch(0.0));
    }

    #[test]
    fn scrolling_near_the_bottom_loads_exactly_one_more_page() {
        let store = ScriptedStore::new();
        store.queue_page(page(experiments(0, 100), Some("c100"), true));
        store.queue_page(page(experiments(100, 100), Some("c200"), true));

        let mut pages = fresh();

        let t1 = pages.begin_fetch().unwrap();
        let first = store.fetch_experiments(&t1.request).unwrap();
        pages.apply_page(t1.epoch, first);
        assert_eq!(pages.len(), 100);

        // User scrolls to within the threshold; one fetch starts, and the
        // repeated threshold checks while it is in flight start nothing.
        assert!(pages.should_fetch(250.0));
        let t2 = pages.begin_fetch().unwrap();
        assert!(!pages.should_fetch(250.0));
        assert!(pages.begin_fetch().is_none());

        let second = store.fetch_experiments(&t2.request).unwrap();
        pages.apply_page(t2.epoch, second);

        assert_eq!(pages.len(), 200);
        assert_eq!(store.fetch_count(), 2);
    }
}
