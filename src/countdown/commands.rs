use tauri::State;

use crate::{countdown::CountdownSnapshot, shell::AppState};

#[tauri::command]
pub async fn get_countdown(state: State<'_, AppState>) -> Result<CountdownSnapshot, String> {
    Ok(state.app.countdown().snapshot().await)
}
