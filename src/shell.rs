use std::sync::Arc;

use log::warn;
use serde_json::Value;
use tauri::{AppHandle, Emitter, Manager, RunEvent, State};

use crate::{
    app::{AppSnapshot, BirthdayApp},
    audio,
    celebration::commands::{
        celebration_activate, celebration_advance, celebration_answer, celebration_key,
    },
    clock::SystemClock,
    config::AppConfig,
    countdown::{commands::get_countdown, CountdownSnapshot},
    decor::DecorConfig,
    events::{EventSink, Events},
    navigation::commands::{begin_celebration, go_to_page},
    pages::commands::{
        gallery_close, gallery_key, gallery_next, gallery_open, gallery_prev, message_key,
        open_curtains,
    },
    session::{FlagStore, ResetOutcome},
};

pub struct AppState {
    pub(crate) app: BirthdayApp,
}

/// Forwards controller events to every webview window.
struct TauriSink {
    handle: AppHandle,
}

impl EventSink for TauriSink {
    fn emit_value(&self, event: &str, payload: Value) {
        if let Err(err) = self.handle.emit(event, payload) {
            warn!("failed to emit {event}: {err}");
        }
    }
}

#[tauri::command]
async fn get_snapshot(state: State<'_, AppState>) -> Result<AppSnapshot, String> {
    Ok(state.app.snapshot().await)
}

#[tauri::command]
fn get_decor(state: State<'_, AppState>) -> Result<DecorConfig, String> {
    Ok(state.app.decor().clone())
}

#[tauri::command]
async fn apply_launch_query(
    state: State<'_, AppState>,
    query: String,
) -> Result<ResetOutcome, String> {
    let result = state.app.apply_launch_query(&query).await;
    state.app.boundary().guard("apply_launch_query", result)
}

#[tauri::command]
async fn developer_reset(state: State<'_, AppState>) -> Result<CountdownSnapshot, String> {
    let result = state.app.developer_reset().await;
    state.app.boundary().guard("developer_reset", result)
}

#[tauri::command]
async fn reload_app(state: State<'_, AppState>) -> Result<CountdownSnapshot, String> {
    let result = state.app.reload().await;
    state.app.boundary().guard("reload_app", result)
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Birthday starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let config = AppConfig::load(Some(&app_data_dir))?;
                let store = Arc::new(FlagStore::new(app_data_dir.join("flags.json"))?);
                let events = Events::new(Arc::new(TauriSink {
                    handle: app.handle().clone(),
                }));
                let music = audio::default_player(config.music_path.clone());

                let birthday =
                    BirthdayApp::new(config, store, events, music, Arc::new(SystemClock))?;
                tauri::async_runtime::block_on(birthday.start());

                app.manage(AppState { app: birthday });
                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_snapshot,
            get_decor,
            apply_launch_query,
            developer_reset,
            reload_app,
            go_to_page,
            begin_celebration,
            get_countdown,
            celebration_advance,
            celebration_answer,
            celebration_activate,
            celebration_key,
            open_curtains,
            message_key,
            gallery_open,
            gallery_close,
            gallery_next,
            gallery_prev,
            gallery_key,
        ])
        .build(tauri::generate_context!())
        .expect("error while running tauri application")
        .run(|handle, event| {
            if let RunEvent::Exit = event {
                if let Some(state) = handle.try_state::<AppState>() {
                    tauri::async_runtime::block_on(state.app.shutdown());
                }
            }
        });
}
