use tauri::State;

use crate::{navigation::GoTo, shell::AppState};

/// `page` is 1 to 4, countdown to gallery.
#[tauri::command]
pub async fn go_to_page(state: State<'_, AppState>, page: u8) -> Result<GoTo, String> {
    let result = state.app.go_to_number(page).await;
    state.app.boundary().guard("go_to_page", result)
}

#[tauri::command]
pub async fn begin_celebration(state: State<'_, AppState>) -> Result<GoTo, String> {
    Ok(state.app.begin_celebration().await)
}
