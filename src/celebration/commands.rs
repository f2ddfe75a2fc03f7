use tauri::State;

use crate::{
    celebration::{Answer, ButtonKey, CelebrationController, CelebrationView},
    shell::AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> CelebrationController {
    state.app.celebration().clone()
}

#[tauri::command]
pub async fn celebration_advance(state: State<'_, AppState>) -> Result<CelebrationView, String> {
    let controller = controller_from_state(&state);
    Ok(controller.advance().await)
}

#[tauri::command]
pub async fn celebration_answer(
    state: State<'_, AppState>,
    answer: Answer,
) -> Result<CelebrationView, String> {
    let controller = controller_from_state(&state);
    Ok(controller.answer(answer).await)
}

#[tauri::command]
pub async fn celebration_activate(
    state: State<'_, AppState>,
    button: ButtonKey,
) -> Result<CelebrationView, String> {
    let controller = controller_from_state(&state);
    Ok(controller.activate(button).await)
}

#[tauri::command]
pub async fn celebration_key(
    state: State<'_, AppState>,
    key: String,
) -> Result<CelebrationView, String> {
    let controller = controller_from_state(&state);
    Ok(controller.handle_key(&key).await)
}
