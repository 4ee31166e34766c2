use gpui::*;
use gpui_component::ActiveTheme;
use gpui_component::notification::NotificationList;
use tracelens_core::routes;

use crate::app::AppState;
use crate::ui::components::experiment_grid::{ExperimentGrid, ExperimentGridState, GridEvent};
use crate::ui::icons::AppIcon;
use crate::ui::toast::ToastManager;
use crate::ui::tokens::{FontSizes, Heights, Spacing};

/// Top-level window content: title bar, the experiments grid, and the
/// notification layer. Navigation requests coming out of the grid resolve
/// against the configured endpoint and are handed to the OS.
pub struct Workspace {
    app_state: Entity<AppState>,
    grid_state: Entity<ExperimentGridState>,
    grid: Entity<ExperimentGrid>,
    notification_list: Entity<NotificationList>,
    focus_handle: FocusHandle,
    _subscriptions: Vec<Subscription>,
}

impl Workspace {
    pub fn new(app_state: Entity<AppState>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        ToastManager::init(window, cx);

        let store = app_state.read(cx).store();
        let grid_state = cx.new(|cx| ExperimentGridState::new(store, cx));
        let grid = cx.new(|cx| ExperimentGrid::new("experiments-grid", grid_state.clone(), cx));
        let notification_list = ToastManager::notification_list(cx);

        let grid_events =
            cx.subscribe(&grid_state, |this, _grid, event: &GridEvent, cx| {
                this.on_grid_event(event, cx);
            });

        grid_state.read(cx).focus_handle().focus(window);

        Self {
            app_state,
            grid_state,
            grid,
            notification_list,
            focus_handle: cx.focus_handle(),
            _subscriptions: vec![grid_events],
        }
    }

    fn on_grid_event(&mut self, event: &GridEvent, cx: &mut Context<Self>) {
        match event {
            GridEvent::SelectionChanged { .. } => {}
            GridEvent::CompareRequested { ids } => {
                self.open_path(routes::compare_path(ids), cx);
            }
            GridEvent::ViewTracesRequested { project_id } => {
                self.open_path(routes::traces_path(project_id), cx);
            }
            GridEvent::DownloadRequested { id } => {
                self.open_path(routes::experiment_export_path(id), cx);
            }
        }
    }

    fn open_path(&self, path: String, cx: &Context<Self>) {
        let endpoint = self.app_state.read(cx).config().endpoint().to_string();
        let url = routes::absolute(&endpoint, &path);

        log::info!("Opening {url}");
        if let Err(error) = open::that(&url) {
            log::error!("Failed to open {url}: {error}");
        }
    }
}

impl Render for Workspace {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme().clone();
        let endpoint = self.app_state.read(cx).config().endpoint().to_string();
        let loaded = self.grid_state.read(cx).pages().len();

        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(theme.background)
            .text_color(theme.foreground)
            .track_focus(&self.focus_handle)
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .h(Heights::TITLEBAR)
                    .px(Spacing::MD)
                    .border_b_1()
                    .border_color(theme.border)
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap(Spacing::SM)
                            .child(
                                svg()
                                    .path(AppIcon::FlaskConical.path())
                                    .size_4()
                                    .text_color(theme.primary),
                            )
                            .child(
                                div()
                                    .text_size(FontSizes::LG)
                                    .font_weight(FontWeight::SEMIBOLD)
                                    .child("Experiments"),
                            )
                            .child(
                                div()
                                    .text_size(FontSizes::SM)
                                    .text_color(theme.muted_foreground)
                                    .child(format!("{loaded} loaded")),
                            ),
                    )
                    .child(
                        div()
                            .text_size(FontSizes::XS)
                            .text_color(theme.muted_foreground)
                            .child(endpoint),
                    ),
            )
            .child(
                div()
                    .flex_1()
                    .overflow_hidden()
                    .p(px(8.0))
                    .child(self.grid.clone()),
            )
            .child(self.notification_list.clone())
    }
}
