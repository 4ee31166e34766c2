use std::collections::HashMap;
use std::sync::Arc;

use gpui::{
    AppContext, Context, EventEmitter, FocusHandle, Focusable, Pixels, Point, ScrollHandle, Size,
    px,
};
use tracelens_core::{
    DeleteExperimentsRequest, ExperimentId, ExperimentPage, ExperimentStore, ScoreRange, SortSpec,
};

use super::columns::{GridColumn, build_columns};
use super::events::GridEvent;
use super::pagination::PageState;
use super::row_cache::{DisplayRow, RowDisplayCache};
use super::selection::RowSelection;
use super::sizing::ColumnSizing;
use super::theme::{FOOTER_HEIGHT, HEADER_HEIGHT, ROW_HEIGHT, SCROLLBAR_WIDTH};
use super::toolbar::{self, DeleteAction};
use crate::ui::toast::PendingToast;

/// An open per-row action menu, positioned relative to the grid origin.
pub struct RowMenu {
    pub row_ix: usize,
    pub position: Point<Pixels>,
}

/// State entity behind the experiments grid.
///
/// Owns the three independent state axes (page growth, column widths,
/// selection) plus the display cache and the delete state machine. Each
/// axis is mutated only through its controller; the renderer observes this
/// entity and reads all of them.
pub struct ExperimentGridState {
    store: Arc<dyn ExperimentStore>,

    columns: Vec<GridColumn>,
    pages: PageState,
    sizing: ColumnSizing,
    selection: RowSelection,
    display_cache: RowDisplayCache,

    /// Annotation column order, sorted by name.
    annotation_names: Vec<Arc<str>>,
    /// Dataset-wide score bounds, captured from the first page.
    annotation_ranges: HashMap<String, ScoreRange>,

    delete_action: DeleteAction,
    row_menu: Option<RowMenu>,
    pending_toast: Option<PendingToast>,

    focus_handle: FocusHandle,
    vertical_scroll_handle: ScrollHandle,
    horizontal_scroll_handle: ScrollHandle,

    /// Viewport size and window origin of the grid (updated on layout).
    viewport_size: Size<Pixels>,
    grid_origin: Point<Pixels>,

    /// Cached horizontal scroll offset for header and body positioning.
    horizontal_offset: Pixels,
}

impl ExperimentGridState {
    pub fn new(store: Arc<dyn ExperimentStore>, cx: &mut Context<Self>) -> Self {
        let columns = build_columns(&[]);
        let sizing = ColumnSizing::new(&columns);

        let mut this = Self {
            store,
            columns,
            pages: PageState::new(SortSpec::default()),
            sizing,
            selection: RowSelection::new(),
            display_cache: RowDisplayCache::new(),
            annotation_names: Vec::new(),
            annotation_ranges: HashMap::new(),
            delete_action: DeleteAction::default(),
            row_menu: None,
            pending_toast: None,
            focus_handle: cx.focus_handle(),
            vertical_scroll_handle: ScrollHandle::new(),
            horizontal_scroll_handle: ScrollHandle::new(),
            viewport_size: Size::default(),
            grid_origin: Point::default(),
            horizontal_offset: px(0.0),
        };

        this.fetch_next(cx);
        this
    }

    // --- Reads for the renderer ---

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn pages(&self) -> &PageState {
        &self.pages
    }

    pub fn sizing(&self) -> &ColumnSizing {
        &self.sizing
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn delete_action(&self) -> &DeleteAction {
        &self.delete_action
    }

    pub fn row_menu(&self) -> Option<&RowMenu> {
        self.row_menu.as_ref()
    }

    /// Re-derives the formatted rows if (and only if) the row list
    /// changed. Called once at the top of a render pass; every width tick
    /// of a drag hits the pointer-equality fast path.
    pub fn prepare_rows(&mut self) {
        let rows = self.pages.rows().clone();
        self.display_cache
            .rows_for(&rows, &self.annotation_names, &self.annotation_ranges);
    }

    /// Formatted rows as of the last [`Self::prepare_rows`].
    pub fn display_rows(&self) -> &[DisplayRow] {
        self.display_cache.cached()
    }

    pub fn take_pending_toast(&mut self) -> Option<PendingToast> {
        self.pending_toast.take()
    }

    // --- Pagination ---

    pub fn fetch_next(&mut self, cx: &mut Context<Self>) {
        let Some(ticket) = self.pages.begin_fetch() else {
            return;
        };
        cx.notify();

        let store = self.store.clone();
        let request = ticket.request;
        let epoch = ticket.epoch;

        let task = cx
            .background_executor()
            .spawn(async move { store.fetch_experiments(&request) });

        cx.spawn(async move |this, cx| {
            let result = task.await;

            this.update(cx, |grid, cx| match result {
                Ok(page) => grid.apply_fetched_page(epoch, page, cx),
                Err(error) => {
                    log::error!("Fetch failed: {error}");
                    grid.pages.fail_fetch(epoch);
                    grid.pending_toast = Some(PendingToast::error(format!(
                        "Failed to load experiments: {error}"
                    )));
                    cx.notify();
                }
            })
            .ok();
        })
        .detach();
    }

    fn apply_fetched_page(&mut self, epoch: u64, mut page: ExperimentPage, cx: &mut Context<Self>) {
        if !self.pages.is_current(epoch) {
            return;
        }

        let ranges = std::mem::take(&mut page.annotation_ranges);
        if !ranges.is_empty() {
            self.set_annotation_ranges(ranges);
        }

        if self.pages.apply_page(epoch, page) {
            cx.notify();
        }
    }

    fn set_annotation_ranges(&mut self, ranges: HashMap<String, ScoreRange>) {
        let mut names: Vec<Arc<str>> = ranges.keys().map(|name| Arc::from(name.as_str())).collect();
        names.sort();

        self.annotation_names = names;
        self.annotation_ranges = ranges;
        self.columns = build_columns(&self.annotation_names);
        self.sizing.rebuild(&self.columns);
        self.display_cache.invalidate();
    }

    /// Drops all rows and reloads from a null cursor. The selection is
    /// pruned to the ids still loaded, which after a reset is none.
    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        self.pages.reset();

        let pages = &self.pages;
        if self.selection.prune(|id| pages.contains(id)) {
            self.emit_selection_changed(cx);
        }
        cx.notify();
        self.fetch_next(cx);
    }

    // --- Selection ---

    fn emit_selection_changed(&mut self, cx: &mut Context<Self>) {
        cx.emit(GridEvent::SelectionChanged {
            selected: self.selection.len(),
        });
        cx.notify();
    }

    pub fn toggle_row(&mut self, id: ExperimentId, cx: &mut Context<Self>) {
        self.selection.toggle(id);
        self.emit_selection_changed(cx);
    }

    pub fn toggle_all(&mut self, cx: &mut Context<Self>) {
        let loaded: Vec<ExperimentId> = self.pages.ids().cloned().collect();
        self.selection.toggle_all(loaded);
        self.emit_selection_changed(cx);
    }

    pub fn clear_selection(&mut self, cx: &mut Context<Self>) {
        if self.selection.clear() {
            self.emit_selection_changed(cx);
        }
    }

    /// Header checkbox state: (all selected, indeterminate).
    pub fn header_check_state(&self) -> (bool, bool) {
        (
            self.selection.selects_every(self.pages.ids()),
            self.selection.is_indeterminate(self.pages.ids()),
        )
    }

    // --- Bulk actions ---

    pub fn can_compare(&self) -> bool {
        self.selection.len() >= 2
    }

    pub fn request_compare(&mut self, cx: &mut Context<Self>) {
        if !self.can_compare() {
            return;
        }
        cx.emit(GridEvent::CompareRequested {
            ids: self.selection.ordered_ids(),
        });
    }

    pub fn request_delete(&mut self, cx: &mut Context<Self>) {
        if self.delete_action.begin_confirm(self.selection.ordered_ids()) {
            cx.notify();
        }
    }

    pub fn cancel_delete(&mut self, cx: &mut Context<Self>) {
        if self.delete_action.cancel() {
            cx.notify();
        }
    }

    pub fn confirm_delete(&mut self, cx: &mut Context<Self>) {
        let Some(ids) = self.delete_action.commit() else {
            return;
        };
        cx.notify();

        let store = self.store.clone();
        let request = DeleteExperimentsRequest::new(ids);

        let task = cx
            .background_executor()
            .spawn(async move { store.delete_experiments(&request) });

        cx.spawn(async move |this, cx| {
            let result = task.await;

            this.update(cx, |grid, cx| grid.finish_delete(result, cx)).ok();
        })
        .detach();
    }

    fn finish_delete(
        &mut self,
        result: Result<(), tracelens_core::ApiError>,
        cx: &mut Context<Self>,
    ) {
        let count = self.delete_action.finish();

        match result {
            Ok(()) => {
                self.pending_toast = Some(PendingToast::success(toolbar::delete_success_message(
                    count,
                )));
                self.selection.clear();
                self.emit_selection_changed(cx);
                self.pages.reset();
                cx.notify();
                self.fetch_next(cx);
            }
            Err(error) => {
                log::error!("Delete failed: {error}");
                self.pending_toast =
                    Some(PendingToast::error(toolbar::delete_failure_message(&error)));
                cx.notify();
            }
        }
    }

    // --- Column resize ---

    pub fn is_resizing(&self) -> bool {
        self.sizing.is_resizing()
    }

    pub fn begin_column_resize(&mut self, col_ix: usize, pointer_x: f32, cx: &mut Context<Self>) {
        let resizable = self.columns.get(col_ix).is_some_and(|c| c.resizable);
        if !resizable {
            return;
        }
        self.sizing.begin_resize(col_ix, pointer_x);
        cx.notify();
    }

    pub fn update_column_resize(&mut self, pointer_x: f32, cx: &mut Context<Self>) {
        if self.sizing.resize_to(pointer_x) {
            cx.notify();
        }
    }

    pub fn end_column_resize(&mut self, cx: &mut Context<Self>) {
        if let Some((key, width)) = self.sizing.end_resize() {
            log::debug!("Column {key:?} resized to {width:.0}px");
            cx.notify();
        }
    }

    // --- Row action menu ---

    pub fn open_row_menu(
        &mut self,
        row_ix: usize,
        window_position: Point<Pixels>,
        cx: &mut Context<Self>,
    ) {
        self.row_menu = Some(RowMenu {
            row_ix,
            position: window_position - self.grid_origin,
        });
        cx.notify();
    }

    pub fn close_row_menu(&mut self, cx: &mut Context<Self>) {
        if self.row_menu.take().is_some() {
            cx.notify();
        }
    }

    pub fn row_project_id(&self, row_ix: usize) -> Option<String> {
        self.pages
            .rows()
            .get(row_ix)
            .and_then(|row| row.project_id.clone())
    }

    pub fn view_row_traces(&mut self, row_ix: usize, cx: &mut Context<Self>) {
        if let Some(project_id) = self.row_project_id(row_ix) {
            cx.emit(GridEvent::ViewTracesRequested { project_id });
        }
        self.close_row_menu(cx);
    }

    pub fn download_row(&mut self, row_ix: usize, cx: &mut Context<Self>) {
        if let Some(row) = self.pages.rows().get(row_ix) {
            cx.emit(GridEvent::DownloadRequested { id: row.id.clone() });
        }
        self.close_row_menu(cx);
    }

    // --- Viewport & scrolling ---

    pub fn focus_handle(&self) -> &FocusHandle {
        &self.focus_handle
    }

    pub fn vertical_scroll_handle(&self) -> &ScrollHandle {
        &self.vertical_scroll_handle
    }

    pub fn horizontal_scroll_handle(&self) -> &ScrollHandle {
        &self.horizontal_scroll_handle
    }

    pub fn horizontal_offset(&self) -> Pixels {
        self.horizontal_offset
    }

    pub fn sync_viewport(
        &mut self,
        origin: Point<Pixels>,
        size: Size<Pixels>,
        cx: &mut Context<Self>,
    ) {
        self.grid_origin = origin;
        if self.viewport_size != size {
            self.viewport_size = size;
            cx.notify();
        }
    }

    /// Sync horizontal offset from the scroll handle. Returns true if it
    /// changed. Clamped against the real viewport since the phantom
    /// scroller reports a 1px viewport of its own.
    pub fn sync_horizontal_offset(&mut self, cx: &mut Context<Self>) -> bool {
        let handle_offset = -self.horizontal_scroll_handle.offset().x;

        let clamped_offset = if self.viewport_size.width > px(0.0) {
            let content_width = px(self.sizing.total_width());
            let viewport_width = self.viewport_size.width - SCROLLBAR_WIDTH;
            let max_offset = (content_width - viewport_width).max(px(0.0));

            handle_offset.clamp(px(0.0), max_offset)
        } else {
            handle_offset.max(px(0.0))
        };

        let diff = (self.horizontal_offset - clamped_offset).abs();
        if diff > px(1.0) {
            self.horizontal_offset = clamped_offset;
            cx.notify();
            return true;
        }

        false
    }

    /// Scroll-threshold trigger, run on every layout sync: when the
    /// viewport bottom is close enough to the end of the loaded rows and
    /// no fetch is in flight, start the next one.
    pub fn maybe_fetch_on_scroll(&mut self, cx: &mut Context<Self>) {
        let body_height =
            (self.viewport_size.height - HEADER_HEIGHT - FOOTER_HEIGHT).max(px(0.0));
        let content_height = ROW_HEIGHT * self.pages.len() as f32;
        let scroll_y = -self.vertical_scroll_handle.offset().y;

        let distance: f32 = (content_height - body_height - scroll_y).into();
        if self.pages.should_fetch(distance) {
            self.fetch_next(cx);
        }
    }
}

impl EventEmitter<GridEvent> for ExperimentGridState {}

impl Focusable for ExperimentGridState {
    fn focus_handle(&self, _cx: &gpui::App) -> FocusHandle {
        self.focus_handle.clone()
    }
}
