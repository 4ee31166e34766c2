mod app;
mod assets;
mod demo;
mod ui;

use std::sync::Arc;

use app::AppState;
use assets::Assets;
use gpui::*;
use gpui_component::Root;
use log::info;
use tracelens_core::{AppConfig, AppConfigStore, ExperimentStore};
use ui::workspace::Workspace;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = load_config();
    info!("Using endpoint {}", config.endpoint());

    Application::new().with_assets(Assets).run(move |cx: &mut App| {
        ui::theme::init(cx);
        ui::components::experiment_grid::init(cx);

        let store: Arc<dyn ExperimentStore> = Arc::new(demo::DemoStore::generate());
        let app_state = cx.new(|_cx| AppState::new(config.clone(), store));

        cx.open_window(
            WindowOptions {
                app_id: Some("tracelens".into()),
                titlebar: Some(TitlebarOptions {
                    title: Some("TraceLens".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            |window, cx| {
                let workspace = cx.new(|cx| Workspace::new(app_state.clone(), window, cx));
                cx.new(|cx| Root::new(workspace, window, cx))
            },
        )
        .expect("Failed to open main window");
    });
}

fn load_config() -> AppConfig {
    let store = match AppConfigStore::new() {
        Ok(store) => store,
        Err(error) => {
            log::warn!("Could not resolve config directory: {error}");
            return AppConfig::default();
        }
    };

    match store.load() {
        Ok(config) => config,
        Err(error) => {
            log::warn!(
                "Failed to load config from {}: {error}",
                store.path().display()
            );
            AppConfig::default()
        }
    }
}
