use std::sync::{Arc, Mutex};

use gpui::prelude::FluentBuilder;
use gpui::{
    AnyElement, App, ClickEvent, Context, Div, ElementId, Entity, FontWeight, InteractiveElement,
    IntoElement, KeyBinding, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    ParentElement, Stateful, StatefulInteractiveElement, Styled, TextAlign, Window, actions, canvas, div,
    px, svg,
};
use gpui_component::ActiveTheme;
use gpui_component::scroll::Scrollbar;

use super::columns::{ColumnKey, GridColumn};
use super::row_cache::{DisplayRow, MetricCell, ScoreCell};
use super::state::ExperimentGridState;
use super::theme::{
    CELL_PADDING_X, FOOTER_HEIGHT, HEADER_HEIGHT, RESIZE_GRIP_WIDTH, ROW_HEIGHT, SCROLLBAR_WIDTH,
};
use super::toolbar;
use crate::ui::icons::AppIcon;
use crate::ui::tokens::{FontSizes, Radii, Spacing};

/// Cached scroll state to prevent unnecessary syncs.
#[derive(Clone)]
struct ScrollSyncState {
    last_viewport_size: gpui::Size<gpui::Pixels>,
    last_h_offset: gpui::Pixels,
}

impl Default for ScrollSyncState {
    fn default() -> Self {
        Self {
            last_viewport_size: gpui::Size::default(),
            last_h_offset: gpui::px(0.0),
        }
    }
}

actions!(
    experiment_grid,
    [ToggleSelectAll, ClearSelection, Refresh, DeleteSelected]
);

const CONTEXT: &str = "ExperimentGrid";

pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("ctrl-a", ToggleSelectAll, Some(CONTEXT)),
        KeyBinding::new("escape", ClearSelection, Some(CONTEXT)),
        KeyBinding::new("ctrl-r", Refresh, Some(CONTEXT)),
        KeyBinding::new("backspace", DeleteSelected, Some(CONTEXT)),
        KeyBinding::new("delete", DeleteSelected, Some(CONTEXT)),
    ]);
}

/// The experiments grid view. All state lives in [`ExperimentGridState`];
/// this view renders it and routes input back into it.
pub struct ExperimentGrid {
    id: ElementId,
    state: Entity<ExperimentGridState>,
    scroll_sync: Arc<Mutex<ScrollSyncState>>,
}

impl ExperimentGrid {
    pub fn new(
        id: impl Into<ElementId>,
        state: Entity<ExperimentGridState>,
        cx: &mut Context<Self>,
    ) -> Self {
        cx.observe(&state, |_this, _state, cx| cx.notify()).detach();

        Self {
            id: id.into(),
            state,
            scroll_sync: Arc::new(Mutex::new(ScrollSyncState::default())),
        }
    }
}

impl gpui::Render for ExperimentGrid {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        // Toasts staged by async completions need a window; flush here.
        let pending = self.state.update(cx, |state, _| state.take_pending_toast());
        crate::ui::toast::flush_pending_toast(pending, window, cx);

        // Re-derive formatted rows only if the row list changed.
        self.state.update(cx, |state, _| state.prepare_rows());

        let theme = cx.theme().clone();

        let (
            row_count,
            selected,
            total_width,
            focus_handle,
            vertical_scroll_handle,
            horizontal_scroll_handle,
            show_confirm,
            show_menu,
        ) = {
            let state = self.state.read(cx);
            (
                state.pages().len(),
                state.selection().len(),
                state.sizing().total_width(),
                state.focus_handle().clone(),
                state.vertical_scroll_handle().clone(),
                state.horizontal_scroll_handle().clone(),
                state.delete_action().is_confirming(),
                state.row_menu().is_some(),
            )
        };

        let header = self.render_header(cx);
        let body = self.render_body(cx);
        let footer = self.render_footer(cx);

        let state_entity = self.state.clone();

        let s = self.state.clone();
        let on_toggle_select_all = move |_: &ToggleSelectAll, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| state.toggle_all(cx));
        };
        let s = self.state.clone();
        let on_clear = move |_: &ClearSelection, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| {
                if state.delete_action().is_confirming() {
                    state.cancel_delete(cx);
                } else if state.row_menu().is_some() {
                    state.close_row_menu(cx);
                } else {
                    state.clear_selection(cx);
                }
            });
        };
        let s = self.state.clone();
        let on_refresh = move |_: &Refresh, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| state.refresh(cx));
        };
        let s = self.state.clone();
        let on_delete_selected = move |_: &DeleteSelected, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| state.request_delete(cx));
        };

        let s = self.state.clone();
        let on_resize_move = move |event: &MouseMoveEvent, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| {
                if state.is_resizing() {
                    let x: f32 = event.position.x.into();
                    state.update_column_resize(x, cx);
                }
            });
        };
        let s = self.state.clone();
        let on_resize_up = move |_: &MouseUpEvent, _: &mut Window, cx: &mut App| {
            s.update(cx, |state, cx| {
                if state.is_resizing() {
                    state.end_column_resize(cx);
                }
            });
        };

        let focus_for_click = focus_handle.clone();

        div()
            .id(self.id.clone())
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(theme.table)
            .border_1()
            .border_color(theme.border)
            .on_action(on_toggle_select_all)
            .on_action(on_clear)
            .on_action(on_refresh)
            .on_action(on_delete_selected)
            .on_mouse_down(MouseButton::Left, move |_, window, _| {
                focus_for_click.focus(window);
            })
            .on_mouse_move(on_resize_move)
            .on_mouse_up(MouseButton::Left, on_resize_up)
            .child(
                div()
                    .id("grid-inner")
                    .flex()
                    .flex_col()
                    .size_full()
                    .child(header)
                    .child(body)
                    .child(footer),
            )
            // Measure the viewport, sync scroll offsets, and run the
            // scroll-threshold fetch check once per layout.
            .child({
                let scroll_sync = self.scroll_sync.clone();
                canvas(
                    move |bounds, _, cx| {
                        let mut sync = scroll_sync.lock().unwrap();
                        state_entity.update(cx, |state, cx| {
                            let new_size = bounds.size;
                            let viewport_changed = new_size != sync.last_viewport_size;

                            if viewport_changed {
                                sync.last_viewport_size = new_size;
                            }
                            state.sync_viewport(bounds.origin, new_size, cx);

                            let current_h_offset = state.horizontal_scroll_handle().offset().x;
                            let h_offset_changed =
                                (current_h_offset - sync.last_h_offset).abs() > gpui::px(0.5);

                            if viewport_changed || h_offset_changed {
                                sync.last_h_offset = current_h_offset;
                                state.sync_horizontal_offset(cx);
                            }

                            state.maybe_fetch_on_scroll(cx);
                        });
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full()
            })
            // Phantom scroller: owns the horizontal scroll handle for the
            // scrollbar. 1px tall so it never receives wheel events.
            .child(
                div()
                    .id("grid-hscroll-owner")
                    .absolute()
                    .left_0()
                    .right(SCROLLBAR_WIDTH)
                    .bottom_0()
                    .h(px(1.0))
                    .overflow_x_scroll()
                    .track_scroll(&horizontal_scroll_handle)
                    .child(div().min_w(px(total_width)).h(px(1.0))),
            )
            .child(
                div()
                    .absolute()
                    .top(HEADER_HEIGHT)
                    .right_0()
                    .bottom(FOOTER_HEIGHT)
                    .w(SCROLLBAR_WIDTH)
                    .when(row_count > 0, |this| {
                        this.child(Scrollbar::vertical(&vertical_scroll_handle))
                    }),
            )
            .child(
                div()
                    .absolute()
                    .left_0()
                    .right_0()
                    .bottom(FOOTER_HEIGHT)
                    .h(SCROLLBAR_WIDTH)
                    .child(Scrollbar::horizontal(&horizontal_scroll_handle)),
            )
            .when(selected > 0 && !show_confirm, |this| {
                this.child(self.render_bulk_toolbar(&theme, cx))
            })
            .when(show_confirm, |this| {
                this.child(self.render_delete_confirm(&theme, cx))
            })
            .when(show_menu, |this| {
                this.child(self.render_row_menu(&theme, cx))
            })
    }
}

impl ExperimentGrid {
    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme().clone();
        let state = self.state.read(cx);

        let (all_selected, indeterminate) = state.header_check_state();
        let has_rows = !state.pages().is_empty();
        let columns = state.columns().to_vec();
        let widths: Vec<f32> = state.sizing().widths().to_vec();
        let total_width = state.sizing().total_width();
        let h_offset = state.horizontal_offset();
        let active_resize = state.sizing().active_column();
        let state_entity = self.state.clone();

        let header_cells: Vec<AnyElement> = columns
            .iter()
            .enumerate()
            .map(|(col_ix, column)| {
                let width = widths.get(col_ix).copied().unwrap_or(120.0);

                if column.key == ColumnKey::Select {
                    let s = state_entity.clone();
                    return div()
                        .id(("header-col", col_ix))
                        .flex()
                        .flex_shrink_0()
                        .items_center()
                        .justify_center()
                        .h(HEADER_HEIGHT)
                        .w(px(width))
                        .border_r_1()
                        .border_color(theme.border)
                        .bg(theme.table_head)
                        .cursor_pointer()
                        .when(has_rows, |this| {
                            this.on_click(move |_: &ClickEvent, _window, cx| {
                                s.update(cx, |state, cx| state.toggle_all(cx));
                            })
                        })
                        .child(checkbox(all_selected, indeterminate, &theme))
                        .into_any_element();
                }

                let is_active = active_resize == Some(col_ix);
                let s = state_entity.clone();

                div()
                    .id(("header-col", col_ix))
                    .relative()
                    .flex()
                    .flex_shrink_0()
                    .items_center()
                    .when(column.align == TextAlign::Right, |d| d.justify_end())
                    .h(HEADER_HEIGHT)
                    .w(px(width))
                    .px(CELL_PADDING_X)
                    .overflow_hidden()
                    .border_r_1()
                    .border_color(theme.border)
                    .bg(theme.table_head)
                    .child(
                        div()
                            .text_sm()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(theme.table_head_foreground)
                            .overflow_hidden()
                            .text_ellipsis()
                            .whitespace_nowrap()
                            .child(column.title.to_string()),
                    )
                    .when(column.resizable, |d| {
                        d.child(
                            div()
                                .id(("header-grip", col_ix))
                                .absolute()
                                .top_0()
                                .bottom_0()
                                .right_0()
                                .w(RESIZE_GRIP_WIDTH)
                                .cursor_col_resize()
                                .hover(|s| s.bg(theme.accent.opacity(0.4)))
                                .when(is_active, |s| s.bg(theme.primary))
                                .on_mouse_down(
                                    MouseButton::Left,
                                    move |event: &MouseDownEvent, _window, cx| {
                                        let x: f32 = event.position.x.into();
                                        s.update(cx, |state, cx| {
                                            state.begin_column_resize(col_ix, x, cx);
                                        });
                                        cx.stop_propagation();
                                    },
                                ),
                        )
                    })
                    .into_any_element()
            })
            .collect();

        div()
            .id("grid-header")
            .flex_shrink_0()
            .h(HEADER_HEIGHT)
            .overflow_hidden()
            .border_b_1()
            .border_color(theme.border)
            .child(
                div()
                    .flex()
                    .min_w(px(total_width))
                    .ml(-h_offset)
                    .bg(theme.table_head)
                    .children(header_cells),
            )
    }

    fn render_body(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme().clone();
        let state = self.state.read(cx);

        let is_fetching = state.pages().is_fetching();
        let is_empty = state.pages().is_empty();
        let columns = state.columns().to_vec();
        let widths: Vec<f32> = state.sizing().widths().to_vec();
        let total_width = state.sizing().total_width();
        let h_offset = state.horizontal_offset();
        let vertical_scroll_handle = state.vertical_scroll_handle().clone();
        let state_entity = self.state.clone();

        let annotation_count = columns
            .iter()
            .filter(|c| matches!(c.key, ColumnKey::Annotation(_)))
            .count();
        let fixed_count = columns.len() - annotation_count;

        let rows: Vec<AnyElement> = state
            .display_rows()
            .iter()
            .enumerate()
            .map(|(row_ix, row)| {
                let is_selected = state.selection().contains(&row.id);
                render_row(
                    &state_entity,
                    row_ix,
                    row,
                    is_selected,
                    &columns,
                    &widths,
                    fixed_count,
                    total_width,
                    &theme,
                )
            })
            .collect();

        div()
            .id("grid-body")
            .flex_1()
            .min_h_0()
            .overflow_hidden()
            .child(
                div()
                    .id("grid-scroll")
                    .size_full()
                    .overflow_y_scroll()
                    .track_scroll(&vertical_scroll_handle)
                    .child(
                        div()
                            .flex()
                            .flex_col()
                            .min_w(px(total_width))
                            .ml(-h_offset)
                            .children(rows)
                            .when(is_fetching, |d| {
                                d.child(
                                    div()
                                        .flex()
                                        .items_center()
                                        .justify_center()
                                        .gap(Spacing::XS)
                                        .h(ROW_HEIGHT)
                                        .w(px(total_width))
                                        .text_size(FontSizes::SM)
                                        .text_color(theme.muted_foreground)
                                        .child(
                                            svg()
                                                .path(AppIcon::Loader.path())
                                                .size_4()
                                                .text_color(theme.muted_foreground),
                                        )
                                        .child("Loading experiments..."),
                                )
                            })
                            .when(is_empty && !is_fetching, |d| {
                                d.child(
                                    div()
                                        .flex()
                                        .items_center()
                                        .justify_center()
                                        .h(px(120.0))
                                        .w(px(total_width))
                                        .text_size(FontSizes::SM)
                                        .text_color(theme.muted_foreground)
                                        .child("No experiments yet"),
                                )
                            }),
                    ),
            )
    }

    fn render_footer(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let theme = cx.theme().clone();
        let state = self.state.read(cx);

        let row_count = state.pages().len();
        let has_more = state.pages().has_more();
        let selected = state.selection().len();
        let s = self.state.clone();

        div()
            .flex_shrink_0()
            .flex()
            .items_center()
            .justify_between()
            .h(FOOTER_HEIGHT)
            .px(Spacing::SM)
            .border_t_1()
            .border_color(theme.border)
            .bg(theme.secondary)
            .text_size(FontSizes::XS)
            .text_color(theme.muted_foreground)
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap(Spacing::XS)
                    .child(
                        div()
                            .id("grid-refresh")
                            .flex()
                            .items_center()
                            .justify_center()
                            .size(px(18.0))
                            .rounded(Radii::SM)
                            .cursor_pointer()
                            .hover(|d| d.bg(theme.muted))
                            .on_click(move |_: &ClickEvent, _window, cx| {
                                s.update(cx, |state, cx| state.refresh(cx));
                            })
                            .child(
                                svg()
                                    .path(AppIcon::RefreshCcw.path())
                                    .size_3()
                                    .text_color(theme.muted_foreground),
                            ),
                    )
                    .child(format!("{row_count} experiments loaded"))
                    .when(has_more, |d| d.child("· scroll for more")),
            )
            .when(selected > 0, |d| {
                d.child(div().text_color(theme.foreground).child(format!("{selected} selected")))
            })
    }

    fn render_bulk_toolbar(
        &self,
        theme: &gpui_component::theme::Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let state = self.state.read(cx);
        let selected = state.selection().len();
        let can_compare = state.can_compare();
        let deleting = state.delete_action().is_in_flight();
        let state_entity = self.state.clone();

        let compare = {
            let s = state_entity.clone();
            div()
                .id("bulk-compare")
                .flex()
                .items_center()
                .gap_1()
                .px(Spacing::SM)
                .py(Spacing::XS)
                .rounded(Radii::SM)
                .text_size(FontSizes::SM)
                .when(can_compare, |d| {
                    d.cursor_pointer()
                        .text_color(theme.foreground)
                        .bg(theme.secondary)
                        .hover(|d| d.bg(theme.muted))
                        .on_click(move |_: &ClickEvent, _window, cx| {
                            s.update(cx, |state, cx| state.request_compare(cx));
                        })
                })
                .when(!can_compare, |d| d.text_color(theme.muted_foreground))
                .child(
                    svg()
                        .path(AppIcon::GitCompare.path())
                        .size_4()
                        .text_color(if can_compare {
                            theme.foreground
                        } else {
                            theme.muted_foreground
                        }),
                )
                .child("Compare")
        };

        let delete = {
            let s = state_entity.clone();
            div()
                .id("bulk-delete")
                .flex()
                .items_center()
                .gap_1()
                .px(Spacing::SM)
                .py(Spacing::XS)
                .rounded(Radii::SM)
                .text_size(FontSizes::SM)
                .text_color(theme.background)
                .bg(theme.danger)
                .when(!deleting, |d| {
                    d.cursor_pointer()
                        .hover(|d| d.opacity(0.9))
                        .on_click(move |_: &ClickEvent, _window, cx| {
                            s.update(cx, |state, cx| state.request_delete(cx));
                        })
                })
                .when(deleting, |d| d.opacity(0.7))
                .child(
                    svg()
                        .path(if deleting {
                            AppIcon::Loader.path()
                        } else {
                            AppIcon::Trash2.path()
                        })
                        .size_4()
                        .text_color(theme.background),
                )
                .child(if deleting { "Deleting..." } else { "Delete" })
        };

        let clear = {
            let s = state_entity.clone();
            div()
                .id("bulk-clear")
                .flex()
                .items_center()
                .justify_center()
                .size(px(24.0))
                .rounded(Radii::SM)
                .cursor_pointer()
                .hover(|d| d.bg(theme.muted))
                .on_click(move |_: &ClickEvent, _window, cx| {
                    s.update(cx, |state, cx| state.clear_selection(cx));
                })
                .child(
                    svg()
                        .path(AppIcon::X.path())
                        .size_4()
                        .text_color(theme.muted_foreground),
                )
        };

        div()
            .absolute()
            .bottom(px(44.0))
            .left_0()
            .right_0()
            .flex()
            .justify_center()
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap(Spacing::SM)
                    .px(Spacing::MD)
                    .py(Spacing::SM)
                    .rounded(Radii::LG)
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.popover)
                    .shadow_lg()
                    .child(
                        div()
                            .text_size(FontSizes::SM)
                            .text_color(theme.foreground)
                            .child(format!("{selected} selected")),
                    )
                    .child(compare)
                    .child(delete)
                    .child(clear),
            )
    }

    fn render_delete_confirm(
        &self,
        theme: &gpui_component::theme::Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let state = self.state.read(cx);
        let count = state.delete_action().pending_count();
        let entity = self.state.clone();
        let entity_cancel = self.state.clone();

        div()
            .id("delete-confirm-overlay")
            .absolute()
            .inset_0()
            .bg(gpui::hsla(0.0, 0.0, 0.0, 0.5))
            .flex()
            .items_center()
            .justify_center()
            .on_mouse_down(MouseButton::Left, |_, _, cx| {
                cx.stop_propagation();
            })
            .child(
                div()
                    .bg(theme.background)
                    .border_1()
                    .border_color(theme.border)
                    .rounded(Radii::MD)
                    .p(Spacing::MD)
                    .min_w(px(340.0))
                    .flex()
                    .flex_col()
                    .gap(Spacing::MD)
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .child(
                                svg()
                                    .path(AppIcon::TriangleAlert.path())
                                    .size_5()
                                    .text_color(theme.warning),
                            )
                            .child(
                                div()
                                    .text_size(FontSizes::SM)
                                    .font_weight(FontWeight::SEMIBOLD)
                                    .text_color(theme.foreground)
                                    .child(toolbar::confirm_title(count)),
                            ),
                    )
                    .child(
                        div()
                            .text_size(FontSizes::SM)
                            .text_color(theme.muted_foreground)
                            .child(toolbar::CONFIRM_DETAIL),
                    )
                    .child(
                        div()
                            .flex()
                            .justify_end()
                            .gap(Spacing::SM)
                            .child(
                                div()
                                    .id("delete-cancel-btn")
                                    .flex()
                                    .items_center()
                                    .gap_1()
                                    .px(Spacing::SM)
                                    .py(Spacing::XS)
                                    .rounded(Radii::SM)
                                    .cursor_pointer()
                                    .text_size(FontSizes::SM)
                                    .text_color(theme.muted_foreground)
                                    .bg(theme.secondary)
                                    .hover(|d| d.bg(theme.muted))
                                    .on_click(move |_: &ClickEvent, _window, cx| {
                                        entity_cancel.update(cx, |state, cx| {
                                            state.cancel_delete(cx);
                                        });
                                    })
                                    .child("Cancel"),
                            )
                            .child(
                                div()
                                    .id("delete-confirm-btn")
                                    .flex()
                                    .items_center()
                                    .gap_1()
                                    .px(Spacing::SM)
                                    .py(Spacing::XS)
                                    .rounded(Radii::SM)
                                    .cursor_pointer()
                                    .text_size(FontSizes::SM)
                                    .text_color(theme.background)
                                    .bg(theme.danger)
                                    .hover(|d| d.opacity(0.9))
                                    .on_click(move |_: &ClickEvent, _window, cx| {
                                        entity.update(cx, |state, cx| {
                                            state.confirm_delete(cx);
                                        });
                                    })
                                    .child(
                                        svg()
                                            .path(AppIcon::Trash2.path())
                                            .size_4()
                                            .text_color(theme.background),
                                    )
                                    .child("Delete"),
                            ),
                    ),
            )
    }

    fn render_row_menu(
        &self,
        theme: &gpui_component::theme::Theme,
        cx: &mut Context<Self>,
    ) -> impl IntoElement {
        let state = self.state.read(cx);
        let Some(menu) = state.row_menu() else {
            return div().into_any_element();
        };
        let row_ix = menu.row_ix;
        let position = menu.position;
        let has_project = state.row_project_id(row_ix).is_some();

        let close_entity = self.state.clone();
        let traces_entity = self.state.clone();
        let download_entity = self.state.clone();

        let item = |id: &'static str, icon: AppIcon, label: &'static str| {
            div()
                .id(id)
                .flex()
                .items_center()
                .gap_2()
                .px(Spacing::SM)
                .py(Spacing::XS)
                .rounded(Radii::SM)
                .cursor_pointer()
                .text_size(FontSizes::SM)
                .text_color(theme.foreground)
                .hover(|d| d.bg(theme.muted))
                .child(svg().path(icon.path()).size_4().text_color(theme.muted_foreground))
                .child(label)
        };

        div()
            .id("row-menu-overlay")
            .absolute()
            .inset_0()
            .on_mouse_down(MouseButton::Left, move |_, _window, cx| {
                close_entity.update(cx, |state, cx| state.close_row_menu(cx));
            })
            .child(
                div()
                    .absolute()
                    .left(position.x)
                    .top(position.y)
                    .min_w(px(160.0))
                    .p(Spacing::XS)
                    .flex()
                    .flex_col()
                    .gap_1()
                    .rounded(Radii::MD)
                    .border_1()
                    .border_color(theme.border)
                    .bg(theme.popover)
                    .shadow_lg()
                    .on_mouse_down(MouseButton::Left, |_, _, cx| {
                        cx.stop_propagation();
                    })
                    .when(has_project, |d| {
                        d.child(item("row-menu-traces", AppIcon::Eye, "View traces").on_click(
                            move |_: &ClickEvent, _window, cx| {
                                traces_entity
                                    .update(cx, |state, cx| state.view_row_traces(row_ix, cx));
                            },
                        ))
                    })
                    .child(item("row-menu-download", AppIcon::Download, "Download").on_click(
                        move |_: &ClickEvent, _window, cx| {
                            download_entity.update(cx, |state, cx| state.download_row(row_ix, cx));
                        },
                    )),
            )
            .into_any_element()
    }
}

/// Renders one data row. Cell content comes from the display cache; this
/// function only lays it out against the current widths.
#[allow(clippy::too_many_arguments)]
fn render_row(
    state_entity: &Entity<ExperimentGridState>,
    row_ix: usize,
    row: &DisplayRow,
    is_selected: bool,
    columns: &[GridColumn],
    widths: &[f32],
    fixed_count: usize,
    total_width: f32,
    theme: &gpui_component::theme::Theme,
) -> AnyElement {
    let cells: Vec<AnyElement> = columns
        .iter()
        .enumerate()
        .map(|(col_ix, column)| {
            let width = widths.get(col_ix).copied().unwrap_or(120.0);

            match &column.key {
                ColumnKey::Select => {
                    let s = state_entity.clone();
                    let id = row.id.clone();
                    div()
                        .id(("row-check", row_ix))
                        .flex()
                        .flex_shrink_0()
                        .items_center()
                        .justify_center()
                        .h(ROW_HEIGHT)
                        .w(px(width))
                        .border_r_1()
                        .border_color(theme.table_row_border)
                        .cursor_pointer()
                        .on_click(move |_: &ClickEvent, _window, cx| {
                            s.update(cx, |state, cx| state.toggle_row(id.clone(), cx));
                        })
                        .child(checkbox(is_selected, false, theme))
                        .into_any_element()
                }
                ColumnKey::Name => text_cell(row_ix, col_ix, width, column, theme)
                    .text_color(theme.foreground)
                    .font_weight(FontWeight::MEDIUM)
                    .child(row.name.clone())
                    .into_any_element(),
                ColumnKey::Description => {
                    metric_cell(row_ix, col_ix, width, column, &row.description, theme)
                }
                ColumnKey::CreatedAt => text_cell(row_ix, col_ix, width, column, theme)
                    .text_color(theme.muted_foreground)
                    .child(row.created_at.clone())
                    .into_any_element(),
                ColumnKey::ErrorRate => {
                    metric_cell(row_ix, col_ix, width, column, &row.error_rate, theme)
                }
                ColumnKey::RunCount => {
                    metric_cell(row_ix, col_ix, width, column, &row.run_count, theme)
                }
                ColumnKey::Latency => {
                    metric_cell(row_ix, col_ix, width, column, &row.latency, theme)
                }
                ColumnKey::Cost => metric_cell(row_ix, col_ix, width, column, &row.cost, theme),
                ColumnKey::Tokens => {
                    metric_cell(row_ix, col_ix, width, column, &row.tokens, theme)
                }
                ColumnKey::Annotation(_) => {
                    let score = row.scores.get(col_ix - fixed_count);
                    score_cell(row_ix, col_ix, width, score, theme)
                }
            }
        })
        .collect();

    let s = state_entity.clone();
    div()
        .id(("row", row_ix))
        .flex()
        .flex_shrink_0()
        .w(px(total_width))
        .h(ROW_HEIGHT)
        .overflow_hidden()
        .border_b_1()
        .border_color(theme.table_row_border)
        .when(row_ix % 2 == 1, |d| d.bg(theme.table_even))
        .when(is_selected, |d| d.bg(theme.table_active))
        .on_mouse_down(MouseButton::Right, move |event: &MouseDownEvent, _window, cx| {
            s.update(cx, |state, cx| {
                state.open_row_menu(row_ix, event.position, cx);
            });
        })
        .children(cells)
        .into_any_element()
}

fn text_cell(
    row_ix: usize,
    col_ix: usize,
    width: f32,
    column: &GridColumn,
    theme: &gpui_component::theme::Theme,
) -> Stateful<Div> {
    div()
        .id(("cell", row_ix * 10000 + col_ix))
        .flex()
        .flex_shrink_0()
        .items_center()
        .when(column.align == TextAlign::Right, |d| d.justify_end())
        .h(ROW_HEIGHT)
        .w(px(width))
        .px(CELL_PADDING_X)
        .overflow_hidden()
        .whitespace_nowrap()
        .text_ellipsis()
        .border_r_1()
        .border_color(theme.table_row_border)
        .text_sm()
}

fn metric_cell(
    row_ix: usize,
    col_ix: usize,
    width: f32,
    column: &GridColumn,
    cell: &MetricCell,
    theme: &gpui_component::theme::Theme,
) -> AnyElement {
    text_cell(row_ix, col_ix, width, column, theme)
        .text_color(if cell.is_missing {
            theme.muted_foreground
        } else {
            theme.foreground
        })
        .when(cell.is_missing, |d| d.italic())
        .child(cell.text.clone())
        .into_any_element()
}

/// An annotation score cell: value over a range-relative fill bar, plus
/// the missing-annotation indicator when some runs lack this annotation.
fn score_cell(
    row_ix: usize,
    col_ix: usize,
    width: f32,
    score: Option<&ScoreCell>,
    theme: &gpui_component::theme::Theme,
) -> AnyElement {
    let Some(score) = score else {
        return div()
            .id(("cell", row_ix * 10000 + col_ix))
            .flex_shrink_0()
            .h(ROW_HEIGHT)
            .w(px(width))
            .border_r_1()
            .border_color(theme.table_row_border)
            .into_any_element();
    };

    // The computed percentage is unclamped; the painted fill is bounded by
    // the clipped cell, the number is not.
    let fill_width = score
        .fill_percent
        .map(|pct| (width * (pct as f32 / 100.0)).max(0.0));

    div()
        .id(("cell", row_ix * 10000 + col_ix))
        .relative()
        .flex_shrink_0()
        .h(ROW_HEIGHT)
        .w(px(width))
        .overflow_hidden()
        .border_r_1()
        .border_color(theme.table_row_border)
        .when_some(fill_width, |d, fill| {
            d.child(
                div()
                    .absolute()
                    .left_0()
                    .top_0()
                    .bottom_0()
                    .w(px(fill))
                    .bg(theme.primary.opacity(0.15)),
            )
        })
        .child(
            div()
                .relative()
                .flex()
                .items_center()
                .gap_1()
                .h_full()
                .px(CELL_PADDING_X)
                .text_sm()
                .child(
                    div()
                        .text_color(if score.fill_percent.is_some() {
                            theme.foreground
                        } else {
                            theme.muted_foreground
                        })
                        .when(score.fill_percent.is_none(), |d| d.italic())
                        .child(score.text.clone()),
                )
                .when(score.shows_missing_indicator(), |d| {
                    d.child(
                        svg()
                            .path(AppIcon::TriangleAlert.path())
                            .size_3()
                            .text_color(theme.warning),
                    )
                    .when_some(score.missing_detail.clone(), |d, detail| {
                        d.child(
                            div()
                                .text_size(FontSizes::XS)
                                .text_color(theme.muted_foreground)
                                .child(detail),
                        )
                    })
                }),
        )
        .into_any_element()
}

/// Square checkbox with check / indeterminate-dash states.
fn checkbox(checked: bool, indeterminate: bool, theme: &gpui_component::theme::Theme) -> Div {
    let filled = checked || indeterminate;

    div()
        .flex()
        .items_center()
        .justify_center()
        .size_4()
        .rounded(Radii::SM)
        .border_1()
        .border_color(if filled { theme.primary } else { theme.border })
        .when(filled, |d| d.bg(theme.primary))
        .when(indeterminate, |d| {
            d.child(
                svg()
                    .path(AppIcon::Minus.path())
                    .size_3()
                    .text_color(theme.primary_foreground),
            )
        })
        .when(checked && !indeterminate, |d| {
            d.child(
                svg()
                    .path(AppIcon::Check.path())
                    .size_3()
                    .text_color(theme.primary_foreground),
            )
        })
}
